//! Console output for run summaries.

use crate::pipeline::RunSummary;
use anyhow::Result;
use colored::Colorize;
use std::fmt::Write;

/// Prints a formatted run summary to stdout.
pub fn print_summary(summary: &RunSummary) {
    print!("{}", format_summary(summary));
}

/// Prints the run summary as pretty JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn print_json(summary: &RunSummary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

#[must_use]
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "─".repeat(50).dimmed());
    let _ = writeln!(out, "  Archives found:     {}", summary.archives);
    let _ = writeln!(out, "  Members extracted:  {}", summary.members_extracted);
    let _ = writeln!(out, "  Reports parsed:     {}", summary.reports_parsed);

    if !summary.skipped.is_empty() {
        let _ = writeln!(
            out,
            "  {} {}",
            "Reports skipped:   ".yellow(),
            summary.skipped.len().to_string().yellow().bold()
        );
        for path in &summary.skipped {
            let _ = writeln!(out, "    {} {}", "-".yellow(), path.display());
        }
    }

    let _ = writeln!(out, "  Rows written:       {}", summary.rows_written);
    let _ = writeln!(out, "  XML files removed:  {}", summary.xml_removed);
    let _ = writeln!(out, "{}", "─".repeat(50).dimmed());

    if summary.rows_written == 0 {
        let _ = writeln!(
            out,
            "{} {}",
            "⚠ No records found; wrote header only to".yellow().bold(),
            summary.csv_path.display()
        );
    } else {
        let _ = writeln!(
            out,
            "{} {}",
            "✓ CSV written to".green().bold(),
            summary.csv_path.display()
        );
    }
    out
}
