// src/cleanup.rs
//! Removes extracted XML from the working directory.

use crate::discovery;
use crate::error::{DmarcError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Deletes every `*.xml` file under `work_dir`, recursively.
/// Other files and all directories are left in place. Returns the number removed.
///
/// Unreadable subdirectories do not stop the sweep: every reachable file is
/// removed first, then the walk error is returned.
///
/// # Errors
/// Returns error if part of the directory cannot be walked or a file cannot be deleted.
pub fn remove_xml(work_dir: &Path) -> Result<usize> {
    if !work_dir.exists() {
        return Ok(0);
    }

    let (paths, walk_error) = discovery::locate_xml_partial(work_dir);
    let mut removed = 0;
    for path in paths {
        fs::remove_file(&path).map_err(|e| DmarcError::io(&path, e))?;
        debug!(path = %path.display(), "removed");
        removed += 1;
    }

    match walk_error {
        Some(e) => Err(e),
        None => Ok(removed),
    }
}
