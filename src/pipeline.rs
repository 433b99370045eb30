// src/pipeline.rs
//! Runs locate → extract → parse → CSV → chart, then always cleans up.

use crate::chart;
use crate::cleanup;
use crate::config::{ChartMode, FailurePolicy, RunConfig};
use crate::discovery;
use crate::error::{DmarcError, Result};
use crate::extract;
use crate::flatten;
use crate::report::{self, Report};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Counts gathered over one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub archives: usize,
    pub members_extracted: usize,
    pub xml_files: usize,
    pub reports_parsed: usize,
    /// Malformed reports passed over under [`FailurePolicy::Skip`].
    pub skipped: Vec<PathBuf>,
    pub rows_written: usize,
    pub xml_removed: usize,
    pub csv_path: PathBuf,
}

/// Executes one full run.
///
/// Cleanup of `*.xml` in the working directory happens whether or not the
/// earlier stages succeed. If both a stage and cleanup fail, the stage error
/// is returned.
///
/// # Errors
/// Returns the first error from extraction, parsing (under `abort`), CSV
/// writing, chart rendering, or cleanup.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let mut summary = RunSummary {
        csv_path: config.output_csv.clone(),
        ..RunSummary::default()
    };

    let outcome = run_stages(config, &mut summary);
    let cleaned = cleanup::remove_xml(&config.work_dir);

    match (outcome, cleaned) {
        (Ok(()), Ok(removed)) => {
            summary.xml_removed = removed;
            info!(removed, "working XML removed");
            Ok(summary)
        }
        (Ok(()), Err(e)) => Err(e),
        (Err(e), Ok(removed)) => {
            info!(removed, "working XML removed after failure");
            Err(e)
        }
        (Err(e), Err(cleanup_err)) => {
            warn!(error = %cleanup_err, "cleanup failed after an earlier error");
            Err(e)
        }
    }
}

fn run_stages(config: &RunConfig, summary: &mut RunSummary) -> Result<()> {
    let archives = discovery::locate_archives(&config.input_dir, &config.exclude_patterns)?;
    summary.archives = archives.len();
    info!(
        zips = archives.zips.len(),
        gzips = archives.gzips.len(),
        root = %config.input_dir.display(),
        "archives located"
    );

    let stats = extract::extract(&archives, &config.work_dir)?;
    summary.members_extracted = stats.members_written;

    let xml_files = discovery::locate_xml(&config.work_dir)?;
    summary.xml_files = xml_files.len();

    let reports = parse_all(&xml_files, config.on_error, &mut summary.skipped)?;
    summary.reports_parsed = reports.len();

    let rows = flatten::flatten(&reports);
    summary.rows_written = flatten::write_csv(&config.output_csv, &rows)?;

    if config.chart != ChartMode::None {
        let bars = chart::top_n(chart::tally_csv(&config.output_csv)?, config.top);
        chart::render(&bars, config.chart)?;
    }
    Ok(())
}

/// Parses each file in order. Under [`FailurePolicy::Skip`], malformed reports
/// are recorded in `skipped`; any other error still aborts.
///
/// # Errors
/// Returns the first error not absorbed by the failure policy.
pub fn parse_all(
    paths: &[PathBuf],
    policy: FailurePolicy,
    skipped: &mut Vec<PathBuf>,
) -> Result<Vec<Report>> {
    let mut reports = Vec::with_capacity(paths.len());
    for path in paths {
        match report::parse(path) {
            Ok(r) => {
                debug!(path = %path.display(), records = r.record_count(), "parsed");
                reports.push(r);
            }
            Err(e @ DmarcError::Parse { .. }) if policy == FailurePolicy::Skip => {
                warn!(error = %e, "skipping malformed report");
                skipped.push(path.clone());
            }
            Err(e) => return Err(e),
        }
    }
    Ok(reports)
}

/// Re-renders the chart from an existing CSV without touching any archives.
///
/// # Errors
/// Returns error if the CSV cannot be read or the chart cannot be shown.
pub fn chart_only(csv: &Path, top: usize, mode: ChartMode) -> Result<Vec<chart::IpTally>> {
    let bars = chart::top_n(chart::tally_csv(csv)?, top);
    chart::render(&bars, mode)?;
    Ok(bars)
}
