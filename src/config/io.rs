// src/config/io.rs
//! Reading and writing `dmarcsift.toml`.

use super::types::Settings;
use crate::error::{DmarcError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const CONFIG_FILE: &str = "dmarcsift.toml";

/// Loads settings from `explicit`, or from `dmarcsift.toml` in the current
/// directory when present, or falls back to defaults.
///
/// # Errors
/// Returns error if an explicit file is missing, or any file read is not valid TOML.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    match explicit {
        Some(path) => read_settings(path),
        None if Path::new(CONFIG_FILE).is_file() => read_settings(Path::new(CONFIG_FILE)),
        None => {
            debug!("no {CONFIG_FILE} found, using defaults");
            Ok(Settings::default())
        }
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| DmarcError::io(path, e))?;
    debug!(path = %path.display(), "loading settings");
    parse_settings(&content)
        .map_err(|e| DmarcError::Config(format!("{}: {e}", path.display())))
}

/// Parses settings TOML. Missing keys take their defaults.
///
/// # Errors
/// Returns error if the content is not valid TOML for [`Settings`].
pub fn parse_settings(content: &str) -> std::result::Result<Settings, toml::de::Error> {
    toml::from_str(content)
}

/// Writes a default settings file at `path` unless one already exists.
/// Returns `true` when a file was written.
///
/// # Errors
/// Returns error if serialization or the write fails.
pub fn write_default(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    let content = toml::to_string_pretty(&Settings::default())
        .map_err(|e| DmarcError::Config(e.to_string()))?;
    fs::write(path, content).map_err(|e| DmarcError::io(path, e))?;
    Ok(true)
}
