// src/cli/handlers.rs
use super::args::Cli;
use crate::config::{self, ChartMode, RunConfig, CONFIG_FILE};
use crate::pipeline;
use crate::reporting;
use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Handles `--init`.
///
/// # Errors
/// Returns error if the file cannot be written.
pub fn handle_init() -> Result<()> {
    let path = Path::new(CONFIG_FILE);
    if config::write_default(path)? {
        println!("{} {}", "✓ Created".green().bold(), path.display());
    } else {
        println!("{} already exists, leaving it alone", path.display());
    }
    Ok(())
}

/// Builds the run configuration from the settings file and command-line overrides.
///
/// # Errors
/// Returns error if the settings file cannot be read or the result is invalid.
pub fn resolve_run_config(cli: &Cli) -> Result<RunConfig> {
    let mut settings = config::load_settings(cli.config.as_deref())?;
    settings.merge(&cli.overrides());
    Ok(RunConfig::resolve(settings, Local::now())?)
}

/// Handles the default run: runs the pipeline and prints the summary.
///
/// # Errors
/// Returns error if any stage fails.
pub fn handle_run(cli: &Cli, run_config: &RunConfig) -> Result<()> {
    info!(
        input = %run_config.input_dir.display(),
        work = %run_config.work_dir.display(),
        csv = %run_config.output_csv.display(),
        "starting run"
    );

    let summary = pipeline::run(run_config).with_context(|| {
        format!(
            "run over {} did not complete",
            run_config.input_dir.display()
        )
    })?;

    if cli.run.json {
        reporting::print_json(&summary)?;
    } else {
        reporting::print_summary(&summary);
    }
    Ok(())
}

/// Handles `dmarcsift chart <CSV>`.
///
/// # Errors
/// Returns error if the CSV cannot be read or the chart cannot be shown.
pub fn handle_chart(csv: &Path, mode: ChartMode, top: usize) -> Result<()> {
    if top == 0 {
        anyhow::bail!("--top must be at least 1");
    }
    pipeline::chart_only(csv, top, mode)
        .with_context(|| format!("Failed to chart {}", csv.display()))?;
    Ok(())
}
