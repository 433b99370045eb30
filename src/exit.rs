// src/exit.rs
//! Standardized process exit codes for `dmarcsift`.
//!
//! Provides a stable contract for cron jobs and wrapper scripts.

use std::process::Termination;

use crate::error::DmarcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum DmarcExit {
    /// Run completed; CSV written and working XML removed.
    Success = 0,
    /// Generic error not attributable to a single stage.
    Error = 1,
    /// Configuration file or flags were invalid.
    InvalidConfig = 2,
    /// An archive was corrupt, unreadable, or unsafe.
    ExtractionFailed = 3,
    /// An XML report was malformed.
    ParseFailed = 4,
    /// Filesystem or CSV I/O failed.
    IoFailed = 5,
    /// The chart could not be displayed.
    ChartFailed = 6,
}

impl DmarcExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Picks the exit code for an error, looking through `anyhow` context layers.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        err.chain()
            .find_map(|cause| cause.downcast_ref::<DmarcError>())
            .map_or(Self::Error, Self::from)
    }
}

impl From<&DmarcError> for DmarcExit {
    fn from(err: &DmarcError) -> Self {
        match err {
            DmarcError::Extraction { .. } => Self::ExtractionFailed,
            DmarcError::Parse { .. } => Self::ParseFailed,
            DmarcError::Io { .. } | DmarcError::Csv { .. } => Self::IoFailed,
            DmarcError::ChartRender(_) => Self::ChartFailed,
            DmarcError::Config(_) => Self::InvalidConfig,
        }
    }
}

impl Termination for DmarcExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
