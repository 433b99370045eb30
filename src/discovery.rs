// src/discovery.rs
//! Locates report archives and extracted XML files.

use crate::error::{DmarcError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const ZIP_SUFFIX: &str = ".zip";
pub const GZIP_SUFFIX: &str = ".gz";
pub const XML_SUFFIX: &str = ".xml";

/// Archives found under an input root, split by container format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveSet {
    pub zips: Vec<PathBuf>,
    pub gzips: Vec<PathBuf>,
}

impl ArchiveSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.zips.len() + self.gzips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zips.is_empty() && self.gzips.is_empty()
    }
}

/// Walks `root` recursively and classifies files by their `.zip` / `.gz` suffix.
/// Suffix matching is case-sensitive. Paths matching any `exclude` regex are skipped.
///
/// # Errors
/// Returns error if `root` or any directory beneath it cannot be read.
pub fn locate_archives(root: &Path, exclude: &[Regex]) -> Result<ArchiveSet> {
    let mut set = ArchiveSet::default();
    for path in walk_files(root)? {
        if is_excluded(&path, exclude) {
            debug!(path = %path.display(), "excluded by pattern");
            continue;
        }
        if has_suffix(&path, ZIP_SUFFIX) {
            set.zips.push(path);
        } else if has_suffix(&path, GZIP_SUFFIX) {
            set.gzips.push(path);
        }
    }
    Ok(set)
}

/// Lists every file under `root` whose name ends in `.xml`.
///
/// # Errors
/// Returns error if `root` or any directory beneath it cannot be read.
pub fn locate_xml(root: &Path) -> Result<Vec<PathBuf>> {
    let (files, error) = walk_partial(root);
    match error {
        Some(e) => Err(e),
        None => Ok(keep_xml(files)),
    }
}

/// Like [`locate_xml`], but keeps walking past unreadable directories.
/// Returns every `.xml` file reached together with the first walk error.
#[must_use]
pub fn locate_xml_partial(root: &Path) -> (Vec<PathBuf>, Option<DmarcError>) {
    let (files, error) = walk_partial(root);
    (keep_xml(files), error)
}

fn keep_xml(files: Vec<PathBuf>) -> Vec<PathBuf> {
    files.into_iter().filter(|p| has_suffix(p, XML_SUFFIX)).collect()
}

fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    match walk_partial(root) {
        (_, Some(e)) => Err(e),
        (files, None) => Ok(files),
    }
}

fn walk_partial(root: &Path) -> (Vec<PathBuf>, Option<DmarcError>) {
    if !root.is_dir() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory");
        return (Vec::new(), Some(DmarcError::io(root, missing)));
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    let (paths, first_error) = accumulate_walker(walker);
    if let Some(e) = &first_error {
        warn!(root = %root.display(), error = %e, "walk incomplete");
    }
    (paths, first_error.map(DmarcError::from))
}

fn accumulate_walker<I>(walker: I) -> (Vec<PathBuf>, Option<walkdir::Error>)
where
    I: Iterator<Item = walkdir::Result<walkdir::DirEntry>>,
{
    let mut paths = Vec::new();
    let mut first_error = None;
    for item in walker {
        match item {
            Ok(entry) => {
                if entry.file_type().is_file() {
                    paths.push(entry.into_path());
                }
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    (paths, first_error)
}

/// Suffix test on the raw file name, so names that are not UTF-8 still match.
fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .is_some_and(|n| n.as_encoded_bytes().ends_with(suffix.as_bytes()))
}

/// Normalizes a path to use forward slashes (cross-platform pattern matching).
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn is_excluded(path: &Path, exclude: &[Regex]) -> bool {
    if exclude.is_empty() {
        return false;
    }
    let s = normalize_path(path);
    exclude.iter().any(|re| re.is_match(&s))
}
