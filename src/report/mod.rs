// src/report/mod.rs
//! DMARC aggregate report model and parser.

pub mod parser;
pub mod types;
pub mod xml;

pub use parser::{parse, parse_str, ROOT_ELEMENT};
pub use types::{PolicyPublished, Record, Report, ReportMetadata};
