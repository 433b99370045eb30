// src/report/parser.rs
//! Turns one DMARC aggregate XML document into a [`Report`].
//!
//! Every field is read independently through [`field`], so a missing node at
//! any depth only nulls the fields beneath it.

use super::types::{PolicyPublished, Record, Report, ReportMetadata};
use super::xml::{self, field, Element};
use crate::error::{DmarcError, Result};
use std::fs;
use std::path::Path;

/// Root element name of an aggregate report.
pub const ROOT_ELEMENT: &str = "feedback";

/// Reads and parses the report at `path`.
///
/// # Errors
/// Returns `Io` if the file cannot be read, `Parse` if it is not a well-formed
/// aggregate report.
pub fn parse(path: &Path) -> Result<Report> {
    let bytes = fs::read(path).map_err(|e| DmarcError::io(path, e))?;
    parse_bytes(&bytes, path)
}

/// Parses report XML held in memory. `source` is recorded on the report and in errors.
///
/// # Errors
/// Returns `Parse` if the XML is not well-formed or the root is not `<feedback>`.
pub fn parse_str(content: &str, source: &Path) -> Result<Report> {
    parse_bytes(content.as_bytes(), source)
}

fn parse_bytes(content: &[u8], source: &Path) -> Result<Report> {
    let root = xml::parse_document(content).map_err(|m| DmarcError::parse(source, m))?;
    if root.name() != ROOT_ELEMENT {
        return Err(DmarcError::parse(
            source,
            format!("root element is <{}>, expected <{ROOT_ELEMENT}>", root.name()),
        ));
    }

    Ok(Report {
        source: source.to_path_buf(),
        metadata: read_metadata(root.child("report_metadata")),
        policy: read_policy(root.child("policy_published")),
        records: root.children("record").map(read_record).collect(),
    })
}

fn read_metadata(meta: Option<&Element>) -> ReportMetadata {
    ReportMetadata {
        org_name: field(meta, &["org_name"]),
        email: field(meta, &["email"]),
        report_id: field(meta, &["report_id"]),
        date_range_begin: field(meta, &["date_range", "begin"]),
        date_range_end: field(meta, &["date_range", "end"]),
    }
}

fn read_policy(policy: Option<&Element>) -> PolicyPublished {
    PolicyPublished {
        domain: field(policy, &["domain"]),
        adkim: field(policy, &["adkim"]),
        aspf: field(policy, &["aspf"]),
        p: field(policy, &["p"]),
        sp: field(policy, &["sp"]),
        pct: field(policy, &["pct"]),
    }
}

fn read_record(record: &Element) -> Record {
    let row = record.child("row");
    let evaluated = row.and_then(|r| r.child("policy_evaluated"));
    let identifiers = record.child("identifiers");
    let auth = record.child("auth_results");

    Record {
        source_ip: field(row, &["source_ip"]),
        count: field(row, &["count"]),
        disposition: field(evaluated, &["disposition"]),
        dkim: field(evaluated, &["dkim"]),
        spf: field(evaluated, &["spf"]),
        header_from: field(identifiers, &["header_from"]),
        auth_dkim_domain: field(auth, &["dkim", "domain"]),
        auth_spf_domain: field(auth, &["spf", "domain"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<feedback>
  <report_metadata>
    <org_name>google.com</org_name>
    <email>noreply-dmarc-support@google.com</email>
    <report_id>1234567890</report_id>
    <date_range>
      <begin>1700000000</begin>
      <end>1700086399</end>
    </date_range>
  </report_metadata>
  <policy_published>
    <domain>example.org</domain>
    <adkim>r</adkim>
    <aspf>s</aspf>
    <p>quarantine</p>
    <sp>reject</sp>
    <pct>100</pct>
  </policy_published>
  <record>
    <row>
      <source_ip>203.0.113.5</source_ip>
      <count>3</count>
      <policy_evaluated>
        <disposition>none</disposition>
        <dkim>pass</dkim>
        <spf>fail</spf>
      </policy_evaluated>
    </row>
    <identifiers>
      <header_from>example.org</header_from>
    </identifiers>
    <auth_results>
      <dkim>
        <domain>example.org</domain>
        <result>pass</result>
      </dkim>
      <spf>
        <domain>bounce.example.org</domain>
        <result>fail</result>
      </spf>
    </auth_results>
  </record>
  <record>
    <row>
      <source_ip>198.51.100.7</source_ip>
      <count>1</count>
    </row>
  </record>
</feedback>
"#;

    fn parse_doc(xml: &str) -> Result<Report> {
        parse_str(xml, Path::new("test.xml"))
    }

    #[test]
    fn test_full_report() {
        let r = parse_doc(FULL).unwrap();
        assert_eq!(r.metadata.org_name.as_deref(), Some("google.com"));
        assert_eq!(r.metadata.email.as_deref(), Some("noreply-dmarc-support@google.com"));
        assert_eq!(r.metadata.report_id.as_deref(), Some("1234567890"));
        assert_eq!(r.metadata.date_range_begin.as_deref(), Some("1700000000"));
        assert_eq!(r.metadata.date_range_end.as_deref(), Some("1700086399"));
        assert_eq!(r.policy.domain.as_deref(), Some("example.org"));
        assert_eq!(r.policy.adkim.as_deref(), Some("r"));
        assert_eq!(r.policy.aspf.as_deref(), Some("s"));
        assert_eq!(r.policy.p.as_deref(), Some("quarantine"));
        assert_eq!(r.policy.sp.as_deref(), Some("reject"));
        assert_eq!(r.policy.pct.as_deref(), Some("100"));

        assert_eq!(r.record_count(), 2);
        let first = &r.records[0];
        assert_eq!(first.source_ip.as_deref(), Some("203.0.113.5"));
        assert_eq!(first.count.as_deref(), Some("3"));
        assert_eq!(first.disposition.as_deref(), Some("none"));
        assert_eq!(first.dkim.as_deref(), Some("pass"));
        assert_eq!(first.spf.as_deref(), Some("fail"));
        assert_eq!(first.header_from.as_deref(), Some("example.org"));
        assert_eq!(first.auth_dkim_domain.as_deref(), Some("example.org"));
        assert_eq!(first.auth_spf_domain.as_deref(), Some("bounce.example.org"));
    }

    #[test]
    fn test_missing_policy_evaluated_nulls_only_its_fields() {
        let r = parse_doc(FULL).unwrap();
        let second = &r.records[1];
        assert_eq!(second.source_ip.as_deref(), Some("198.51.100.7"));
        assert_eq!(second.count.as_deref(), Some("1"));
        assert_eq!(second.disposition, None);
        assert_eq!(second.dkim, None);
        assert_eq!(second.spf, None);
        assert_eq!(second.header_from, None);
        assert_eq!(second.auth_dkim_domain, None);
        assert_eq!(second.auth_spf_domain, None);
    }

    #[test]
    fn test_bare_feedback_root() {
        let r = parse_doc("<feedback/>").unwrap();
        assert_eq!(r.metadata, ReportMetadata::default());
        assert_eq!(r.policy, PolicyPublished::default());
        assert!(r.records.is_empty());
    }

    #[test]
    fn test_missing_date_range() {
        let r = parse_doc(
            "<feedback><report_metadata><org_name>acme</org_name></report_metadata></feedback>",
        )
        .unwrap();
        assert_eq!(r.metadata.org_name.as_deref(), Some("acme"));
        assert_eq!(r.metadata.date_range_begin, None);
        assert_eq!(r.metadata.date_range_end, None);
    }

    #[test]
    fn test_empty_record_yields_all_null_record() {
        let xml = "<feedback>\
            <record/>\
            <record><row><source_ip>192.0.2.1</source_ip><count>7</count></row></record>\
        </feedback>";
        let r = parse_doc(xml).unwrap();
        assert_eq!(r.records.len(), 2);
        assert_eq!(r.records[0], Record::default());
        assert_eq!(r.records[1].source_ip.as_deref(), Some("192.0.2.1"));
        assert_eq!(r.records[1].count.as_deref(), Some("7"));
    }

    #[test]
    fn test_record_without_row_keeps_identifiers() {
        let xml = "<feedback><record>\
            <identifiers><header_from>example.net</header_from></identifiers>\
            <auth_results><spf><domain>mail.example.net</domain></spf></auth_results>\
        </record></feedback>";
        let r = parse_doc(xml).unwrap();
        let rec = &r.records[0];
        assert_eq!(rec.source_ip, None);
        assert_eq!(rec.count, None);
        assert_eq!(rec.disposition, None);
        assert_eq!(rec.header_from.as_deref(), Some("example.net"));
        assert_eq!(rec.auth_dkim_domain, None);
        assert_eq!(rec.auth_spf_domain.as_deref(), Some("mail.example.net"));
    }

    #[test]
    fn test_first_of_multiple_dkim_results_used() {
        let xml = "<feedback><record><auth_results>\
            <dkim><domain>first.example</domain></dkim>\
            <dkim><domain>second.example</domain></dkim>\
        </auth_results></record></feedback>";
        let r = parse_doc(xml).unwrap();
        assert_eq!(r.records[0].auth_dkim_domain.as_deref(), Some("first.example"));
    }

    #[test]
    fn test_duplicate_records_kept_in_order() {
        let rec = "<record><row><source_ip>10.0.0.1</source_ip><count>1</count></row></record>";
        let other = "<record><row><source_ip>10.0.0.2</source_ip></row></record>";
        let xml = format!("<feedback>{rec}{other}{rec}</feedback>");
        let r = parse_doc(&xml).unwrap();
        let ips: Vec<_> = r.records.iter().map(|x| x.source_ip.as_deref()).collect();
        assert_eq!(ips, vec![Some("10.0.0.1"), Some("10.0.0.2"), Some("10.0.0.1")]);
    }

    #[test]
    fn test_non_numeric_count_kept_raw() {
        let xml = "<feedback><record><row><count>lots</count></row></record></feedback>";
        let r = parse_doc(xml).unwrap();
        assert_eq!(r.records[0].count.as_deref(), Some("lots"));
    }

    #[test]
    fn test_wrong_root_is_parse_error() {
        let err = parse_doc("<html><body/></html>").unwrap_err();
        assert!(matches!(err, DmarcError::Parse { .. }));
    }

    #[test]
    fn test_malformed_is_parse_error() {
        let err = parse_doc("<feedback><record></feedback>").unwrap_err();
        assert!(matches!(err, DmarcError::Parse { .. }));
    }

    #[test]
    fn test_namespaced_dmarc2_report() {
        let xml = r#"<feedback xmlns="urn:ietf:params:xml:ns:dmarc-2.0">
            <policy_published><domain>example.com</domain></policy_published>
            <record><row><source_ip>2001:db8::1</source_ip></row></record>
        </feedback>"#;
        let r = parse_doc(xml).unwrap();
        assert_eq!(r.policy.domain.as_deref(), Some("example.com"));
        assert_eq!(r.records[0].source_ip.as_deref(), Some("2001:db8::1"));
    }

    #[test]
    fn test_reads_latin1_report_from_disk() {
        let d = tempfile::TempDir::new().unwrap();
        let path = d.path().join("latin1.xml");
        let mut doc = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n".to_vec();
        doc.extend_from_slice(b"<feedback><report_metadata><org_name>Soci\xe9t\xe9 G\xe9n\xe9rale</org_name>");
        doc.extend_from_slice(b"</report_metadata><record><row><source_ip>192.0.2.5</source_ip>");
        doc.extend_from_slice(b"<count>3</count></row></record></feedback>");
        fs::write(&path, doc).unwrap();

        let r = parse(&path).unwrap();
        assert_eq!(r.metadata.org_name.as_deref(), Some("Soci\u{e9}t\u{e9} G\u{e9}n\u{e9}rale"));
        assert_eq!(r.records[0].source_ip.as_deref(), Some("192.0.2.5"));
    }

    #[test]
    fn test_invalid_utf8_without_declaration_is_parse_error() {
        let d = tempfile::TempDir::new().unwrap();
        let path = d.path().join("bad.xml");
        fs::write(&path, b"<feedback><report_metadata><org_name>\xff</org_name></report_metadata></feedback>").unwrap();
        assert!(matches!(parse(&path), Err(DmarcError::Parse { .. })));
    }
}
