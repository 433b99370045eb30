// src/chart/mod.rs
//! Aggregates the CSV by source IP and renders the top-N bar chart.

pub mod text;
#[cfg(feature = "tui")]
pub mod tui;

use crate::config::ChartMode;
use crate::error::{DmarcError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Label used for rows whose `source_ip` cell is empty.
pub const UNKNOWN_IP: &str = "(unknown)";

pub const CHART_TITLE: &str = "Top source IPs by message count";
pub const X_AXIS_LABEL: &str = "Source IP";
pub const Y_AXIS_LABEL: &str = "Message count";

/// Summed message count for one source IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpTally {
    pub source_ip: String,
    pub total: u64,
}

impl IpTally {
    /// Display label; empty IPs show as [`UNKNOWN_IP`].
    #[must_use]
    pub fn label(&self) -> &str {
        if self.source_ip.is_empty() {
            UNKNOWN_IP
        } else {
            &self.source_ip
        }
    }
}

/// Groups `(source_ip, count)` pairs in first-seen order and sums the counts.
/// A count that is missing or not a non-negative integer adds zero.
pub fn tally<'a, I>(rows: I) -> Vec<IpTally>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut out: Vec<IpTally> = Vec::new();

    for (ip, count) in rows {
        let n = count.trim().parse::<u64>().unwrap_or(0);
        match index.get(ip) {
            Some(&i) => out[i].total = out[i].total.saturating_add(n),
            None => {
                index.insert(ip, out.len());
                out.push(IpTally {
                    source_ip: ip.to_string(),
                    total: n,
                });
            }
        }
    }
    out
}

/// Keeps the `n` largest totals, descending. Ties keep first-seen order.
#[must_use]
pub fn top_n(mut tallies: Vec<IpTally>, n: usize) -> Vec<IpTally> {
    tallies.sort_by(|a, b| b.total.cmp(&a.total));
    tallies.truncate(n);
    tallies
}

/// Reads a CSV written by [`crate::flatten::write_csv`] and tallies it by source IP.
/// Columns are located by header name.
///
/// # Errors
/// Returns error if the file cannot be read or lacks a `source_ip`/`count` column.
pub fn tally_csv(path: &Path) -> Result<Vec<IpTally>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| DmarcError::csv(path, e))?;

    let headers = reader.headers().map_err(|e| DmarcError::csv(path, e))?.clone();
    let column = |name: &str| {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            DmarcError::ChartRender(format!("{} has no `{name}` column", path.display()))
        })
    };
    let ip_col = column("source_ip")?;
    let count_col = column("count")?;

    let mut records = Vec::new();
    for rec in reader.records() {
        records.push(rec.map_err(|e| DmarcError::csv(path, e))?);
    }

    Ok(tally(records.iter().map(|r| {
        (
            r.get(ip_col).unwrap_or(""),
            r.get(count_col).unwrap_or(""),
        )
    })))
}

/// Presents `bars` according to `mode`.
///
/// # Errors
/// Returns `ChartRender` if an interactive chart cannot be shown.
pub fn render(bars: &[IpTally], mode: ChartMode) -> Result<()> {
    match mode {
        ChartMode::None => Ok(()),
        ChartMode::Text => {
            print!("{}", text::render(bars));
            Ok(())
        }
        ChartMode::Interactive => render_interactive(bars),
    }
}

#[cfg(feature = "tui")]
fn render_interactive(bars: &[IpTally]) -> Result<()> {
    tui::show(bars)
}

#[cfg(not(feature = "tui"))]
fn render_interactive(_bars: &[IpTally]) -> Result<()> {
    Err(DmarcError::ChartRender(
        "interactive charts need the `tui` feature".into(),
    ))
}
