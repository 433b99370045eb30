// src/config/mod.rs
pub mod io;
pub mod types;

pub use self::io::{load_settings, write_default, CONFIG_FILE};
pub use self::types::{ChartMode, FailurePolicy, Overrides, RunConfig, Settings};

use crate::error::{DmarcError, Result};
use chrono::{DateTime, Local};
use regex::Regex;
use std::path::PathBuf;

/// Prefix of every generated CSV file name.
pub const CSV_PREFIX: &str = "dmarc_reports";

/// `strftime` pattern of the run timestamp embedded in the CSV name.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Returns `dmarc_reports<YYYY-MM-DD HH-MM-SS>.csv` for the given instant.
#[must_use]
pub fn csv_file_name(at: &DateTime<Local>) -> String {
    format!("{CSV_PREFIX}{}.csv", at.format(TIMESTAMP_FORMAT))
}

impl Settings {
    /// Applies command-line overrides on top of file settings.
    pub fn merge(&mut self, o: &Overrides) {
        if let Some(p) = &o.input_dir {
            self.input_dir.clone_from(p);
        }
        if let Some(p) = &o.work_dir {
            self.work_dir = Some(p.clone());
        }
        if let Some(p) = &o.output_dir {
            self.output_dir.clone_from(p);
        }
        if let Some(p) = &o.output_csv {
            self.output_csv = Some(p.clone());
        }
        if let Some(policy) = o.on_error {
            self.on_error = policy;
        }
        if let Some(mode) = o.chart {
            self.chart = mode;
        }
        if let Some(top) = o.top {
            self.top = top;
        }
        self.verbose |= o.verbose;
    }
}

impl RunConfig {
    /// Resolves settings into a run configuration. `started_at` names the CSV
    /// when no explicit path is set.
    ///
    /// # Errors
    /// Returns error if `top` is zero or an exclude pattern is not a valid regex.
    pub fn resolve(settings: Settings, started_at: DateTime<Local>) -> Result<Self> {
        if settings.top == 0 {
            return Err(DmarcError::Config("`top` must be at least 1".into()));
        }

        let exclude_patterns = settings
            .exclude
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| DmarcError::Config(format!("bad exclude pattern {p:?}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        let work_dir = settings
            .work_dir
            .unwrap_or_else(|| settings.input_dir.clone());
        let output_csv = settings
            .output_csv
            .unwrap_or_else(|| settings.output_dir.join(csv_file_name(&started_at)));

        Ok(Self {
            input_dir: settings.input_dir,
            work_dir,
            output_csv,
            on_error: settings.on_error,
            chart: settings.chart,
            top: settings.top,
            verbose: settings.verbose,
            exclude_patterns,
        })
    }

    /// Builds a configuration for the given directories with every other value defaulted.
    #[must_use]
    pub fn for_dirs(input_dir: impl Into<PathBuf>, work_dir: impl Into<PathBuf>, output_csv: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            work_dir: work_dir.into(),
            output_csv: output_csv.into(),
            on_error: FailurePolicy::default(),
            chart: ChartMode::None,
            top: Settings::default().top,
            verbose: false,
            exclude_patterns: Vec::new(),
        }
    }
}
