//! Flattens DMARC aggregate-report archives into CSV rows and charts the
//! busiest source IPs.
//!
//! The pipeline runs once per invocation:
//! [`discovery`] → [`extract`] → [`report`] → [`flatten`] → [`chart`] →
//! [`cleanup`], orchestrated by [`pipeline::run`].

pub mod chart;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exit;
pub mod extract;
pub mod flatten;
pub mod pipeline;
pub mod report;
pub mod reporting;

pub use error::{DmarcError, Result};
pub use pipeline::{run, RunSummary};
