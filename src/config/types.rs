// src/config/types.rs
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do when a single XML report cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the whole batch on the first malformed report.
    #[default]
    Abort,
    /// Log the malformed report and carry on with the rest.
    Skip,
}

/// How the top-source-IP chart is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// Full-screen bar chart; requires a terminal.
    Interactive,
    /// Colored bar listing printed to stdout.
    #[default]
    Text,
    /// Skip the chart entirely.
    None,
}

/// On-disk settings from `dmarcsift.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory searched recursively for `.zip` / `.gz` archives.
    pub input_dir: PathBuf,
    /// Extraction destination. Defaults to `input_dir`.
    pub work_dir: Option<PathBuf>,
    /// Directory that receives the timestamped CSV.
    pub output_dir: PathBuf,
    /// Exact CSV path; overrides `output_dir`.
    pub output_csv: Option<PathBuf>,
    pub on_error: FailurePolicy,
    pub chart: ChartMode,
    /// Number of source IPs shown in the chart.
    pub top: usize,
    pub verbose: bool,
    /// Regexes matched against archive paths; matches are not extracted.
    pub exclude: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            work_dir: None,
            output_dir: PathBuf::from("."),
            output_csv: None,
            on_error: FailurePolicy::default(),
            chart: ChartMode::default(),
            top: 20,
            verbose: false,
            exclude: Vec::new(),
        }
    }
}

/// Command-line values that take precedence over the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input_dir: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub output_csv: Option<PathBuf>,
    pub on_error: Option<FailurePolicy>,
    pub chart: Option<ChartMode>,
    pub top: Option<usize>,
    pub verbose: bool,
}

/// Resolved configuration for one run. Built once at startup and passed to every stage.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub work_dir: PathBuf,
    pub output_csv: PathBuf,
    pub on_error: FailurePolicy,
    pub chart: ChartMode,
    pub top: usize,
    pub verbose: bool,
    pub exclude_patterns: Vec<Regex>,
}
