// src/report/types.rs
use serde::Serialize;
use std::path::PathBuf;

/// `<report_metadata>` fields. Every value is raw element text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportMetadata {
    pub org_name: Option<String>,
    pub email: Option<String>,
    pub report_id: Option<String>,
    pub date_range_begin: Option<String>,
    pub date_range_end: Option<String>,
}

/// `<policy_published>` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PolicyPublished {
    pub domain: Option<String>,
    pub adkim: Option<String>,
    pub aspf: Option<String>,
    pub p: Option<String>,
    pub sp: Option<String>,
    pub pct: Option<String>,
}

/// One `<record>`: a source IP, its message count and evaluation outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub source_ip: Option<String>,
    /// Kept as text; reports in the wild are not always numeric here.
    pub count: Option<String>,
    pub disposition: Option<String>,
    pub dkim: Option<String>,
    pub spf: Option<String>,
    pub header_from: Option<String>,
    pub auth_dkim_domain: Option<String>,
    pub auth_spf_domain: Option<String>,
}

/// A parsed aggregate report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub source: PathBuf,
    pub metadata: ReportMetadata,
    pub policy: PolicyPublished,
    /// Document order, duplicates retained.
    pub records: Vec<Record>,
}

impl Report {
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
