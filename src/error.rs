// src/error.rs
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DmarcError {
    #[error("failed to extract {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("CSV error: {source} (path: {path})")]
    Csv { source: csv::Error, path: PathBuf },

    #[error("cannot render chart: {0}")]
    ChartRender(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DmarcError>;

impl DmarcError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: path.to_path_buf(),
        }
    }

    pub(crate) fn extraction(path: &Path, message: impl Into<String>) -> Self {
        Self::Extraction {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            source,
            path: path.to_path_buf(),
        }
    }
}

/// Keeps the path of the entry that could not be read.
impl From<walkdir::Error> for DmarcError {
    fn from(e: walkdir::Error) -> Self {
        let path = e.path().map_or_else(|| PathBuf::from("<unknown>"), Path::to_path_buf);
        match e.into_io_error() {
            Some(source) => DmarcError::Io { source, path },
            None => DmarcError::Io {
                source: std::io::Error::other("filesystem loop detected"),
                path,
            },
        }
    }
}
