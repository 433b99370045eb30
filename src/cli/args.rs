use crate::config::{ChartMode, FailurePolicy, Overrides};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dmarcsift",
    version,
    about = "Flatten DMARC aggregate reports into CSV"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Write a default dmarcsift.toml and exit
    #[arg(long)]
    pub init: bool,
    /// Settings file (default: ./dmarcsift.toml when present)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
    /// Debug-level logging on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-render the top source IP chart from an existing CSV
    Chart {
        #[arg(value_name = "CSV")]
        csv: PathBuf,
        #[arg(long, value_enum, default_value_t = ChartMode::Text)]
        mode: ChartMode,
        #[arg(long, default_value = "20")]
        top: usize,
    },
}

/// Options for the default run.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Directory searched recursively for .zip/.gz archives
    #[arg(long, short, value_name = "DIR")]
    pub input: Option<PathBuf>,
    /// Extraction directory (default: the input directory)
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,
    /// Directory for the timestamped CSV
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
    /// Exact CSV path (overrides --output-dir)
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Malformed XML handling
    #[arg(long, value_enum)]
    pub on_error: Option<FailurePolicy>,
    /// Chart presentation
    #[arg(long, value_enum)]
    pub chart: Option<ChartMode>,
    /// Number of source IPs in the chart
    #[arg(long)]
    pub top: Option<usize>,
    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Flags that override values from the settings file.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            input_dir: self.run.input.clone(),
            work_dir: self.run.work_dir.clone(),
            output_dir: self.run.output_dir.clone(),
            output_csv: self.run.output.clone(),
            on_error: self.run.on_error,
            chart: self.run.chart,
            top: self.run.top,
            verbose: self.verbose,
        }
    }
}
