// src/chart/text.rs
//! Plain terminal rendering of the top-IP chart.

use super::{IpTally, CHART_TITLE, X_AXIS_LABEL, Y_AXIS_LABEL};
use colored::Colorize;
use std::fmt::Write;

const BAR_WIDTH: u64 = 40;
const BAR_CHAR: &str = "█";

/// Renders one line per IP with a bar scaled to the largest total.
#[must_use]
pub fn render(bars: &[IpTally]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", CHART_TITLE.bold());

    if bars.is_empty() {
        let _ = writeln!(out, "  {}", "No records to chart.".dimmed());
        return out;
    }

    let label_width = bars
        .iter()
        .map(|b| b.label().len())
        .max()
        .unwrap_or(0)
        .max(X_AXIS_LABEL.len());
    let max = bars.iter().map(|b| b.total).max().unwrap_or(0);

    let _ = writeln!(
        out,
        "  {:<label_width$}  {}",
        X_AXIS_LABEL.dimmed(),
        Y_AXIS_LABEL.dimmed()
    );
    for b in bars {
        let bar = BAR_CHAR.repeat(scaled(b.total, max));
        let _ = writeln!(
            out,
            "  {:<label_width$}  {} {}",
            b.label(),
            bar.cyan(),
            b.total.to_string().bold()
        );
    }
    out
}

fn scaled(value: u64, max: u64) -> usize {
    if max == 0 {
        return 0;
    }
    let len = value.saturating_mul(BAR_WIDTH) / max;
    // Non-zero values always get a visible bar.
    let len = if value > 0 { len.max(1) } else { len };
    usize::try_from(len).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ip: &str, total: u64) -> IpTally {
        IpTally {
            source_ip: ip.into(),
            total,
        }
    }

    #[test]
    fn test_scaling() {
        assert_eq!(scaled(10, 10), 40);
        assert_eq!(scaled(5, 10), 20);
        assert_eq!(scaled(1, 1000), 1);
        assert_eq!(scaled(0, 10), 0);
        assert_eq!(scaled(0, 0), 0);
    }

    #[test]
    fn test_lists_every_ip_with_total() {
        let out = render(&[bar("203.0.113.5", 120), bar("", 3)]);
        assert!(out.contains(CHART_TITLE));
        assert!(out.contains("203.0.113.5"));
        assert!(out.contains("120"));
        assert!(out.contains(super::super::UNKNOWN_IP));
    }

    #[test]
    fn test_empty_chart_message() {
        assert!(render(&[]).contains("No records"));
    }
}
