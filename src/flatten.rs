// src/flatten.rs
//! Joins reports and records into flat rows and writes them as CSV.

use crate::error::{DmarcError, Result};
use crate::report::{Record, Report};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Fixed CSV header, in column order.
pub const COLUMNS: [&str; 19] = [
    "org_name",
    "email",
    "report_id",
    "date_range_begin",
    "date_range_end",
    "domain",
    "adkim",
    "aspf",
    "policy_p",
    "policy_sp",
    "policy_pct",
    "source_ip",
    "count",
    "disposition",
    "dkim",
    "spf",
    "header_from",
    "auth_results_dkim",
    "auth_results_spf",
];

/// One CSV line: report metadata and policy repeated beside one record.
/// Field order matches [`COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRow {
    pub org_name: Option<String>,
    pub email: Option<String>,
    pub report_id: Option<String>,
    pub date_range_begin: Option<String>,
    pub date_range_end: Option<String>,
    pub domain: Option<String>,
    pub adkim: Option<String>,
    pub aspf: Option<String>,
    pub policy_p: Option<String>,
    pub policy_sp: Option<String>,
    pub policy_pct: Option<String>,
    pub source_ip: Option<String>,
    pub count: Option<String>,
    pub disposition: Option<String>,
    pub dkim: Option<String>,
    pub spf: Option<String>,
    pub header_from: Option<String>,
    pub auth_results_dkim: Option<String>,
    pub auth_results_spf: Option<String>,
}

impl FlatRow {
    #[must_use]
    pub fn join(report: &Report, record: &Record) -> Self {
        let m = &report.metadata;
        let p = &report.policy;
        Self {
            org_name: m.org_name.clone(),
            email: m.email.clone(),
            report_id: m.report_id.clone(),
            date_range_begin: m.date_range_begin.clone(),
            date_range_end: m.date_range_end.clone(),
            domain: p.domain.clone(),
            adkim: p.adkim.clone(),
            aspf: p.aspf.clone(),
            policy_p: p.p.clone(),
            policy_sp: p.sp.clone(),
            policy_pct: p.pct.clone(),
            source_ip: record.source_ip.clone(),
            count: record.count.clone(),
            disposition: record.disposition.clone(),
            dkim: record.dkim.clone(),
            spf: record.spf.clone(),
            header_from: record.header_from.clone(),
            auth_results_dkim: record.auth_dkim_domain.clone(),
            auth_results_spf: record.auth_spf_domain.clone(),
        }
    }
}

/// One row per record: all of report 0's records, then report 1's, and so on.
#[must_use]
pub fn flatten(reports: &[Report]) -> Vec<FlatRow> {
    reports
        .iter()
        .flat_map(|report| report.records.iter().map(move |rec| FlatRow::join(report, rec)))
        .collect()
}

/// Writes the header and `rows` to `path`, creating parent directories.
/// Returns the number of data rows written.
///
/// # Errors
/// Returns error if the file cannot be created or a row fails to serialize.
pub fn write_csv(path: &Path, rows: &[FlatRow]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DmarcError::io(parent, e))?;
    }

    // Header is written by hand so it is present even with zero rows.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| DmarcError::csv(path, e))?;

    writer
        .write_record(COLUMNS)
        .map_err(|e| DmarcError::csv(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| DmarcError::csv(path, e))?;
    }
    writer.flush().map_err(|e| DmarcError::io(path, e))?;

    info!(rows = rows.len(), path = %path.display(), "CSV written");
    Ok(rows.len())
}
