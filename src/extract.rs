// src/extract.rs
//! Decompresses located archives into the working directory.

use crate::discovery::{ArchiveSet, GZIP_SUFFIX};
use crate::error::{DmarcError, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub zip_archives: usize,
    pub gzip_files: usize,
    pub members_written: usize,
}

/// Extracts every archive in `archives` into `destination`.
///
/// Errors are not caught here: the first corrupt archive or unwritable
/// destination aborts extraction.
///
/// # Errors
/// Returns `Extraction` for corrupt archives and `Io` for filesystem failures.
pub fn extract(archives: &ArchiveSet, destination: &Path) -> Result<ExtractStats> {
    fs::create_dir_all(destination).map_err(|e| DmarcError::io(destination, e))?;

    let mut stats = ExtractStats::default();
    for zip in &archives.zips {
        stats.members_written += extract_zip(zip, destination)?;
        stats.zip_archives += 1;
    }
    for gz in &archives.gzips {
        extract_gzip(gz, destination)?;
        stats.gzip_files += 1;
        stats.members_written += 1;
    }

    info!(
        zips = stats.zip_archives,
        gzips = stats.gzip_files,
        members = stats.members_written,
        "extraction finished"
    );
    Ok(stats)
}

/// Extracts all members of a zip archive, preserving member-relative paths.
/// Returns the number of files written.
///
/// # Errors
/// Returns error if the archive is corrupt, a member path escapes `destination`,
/// or writing fails.
pub fn extract_zip(path: &Path, destination: &Path) -> Result<usize> {
    let file = File::open(path).map_err(|e| DmarcError::extraction(path, e.to_string()))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| DmarcError::extraction(path, e.to_string()))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut member = archive
            .by_index(i)
            .map_err(|e| DmarcError::extraction(path, e.to_string()))?;

        let Some(rel) = member.enclosed_name() else {
            return Err(DmarcError::extraction(
                path,
                format!("member {:?} escapes the destination", member.name()),
            ));
        };
        let target = destination.join(rel);

        if member.is_dir() {
            fs::create_dir_all(&target).map_err(|e| DmarcError::io(&target, e))?;
            continue;
        }

        ensure_parent(&target)?;
        debug!(archive = %path.display(), member = %target.display(), "unzipping");
        let mut out = create_output(&target)?;
        io::copy(&mut member, &mut out)
            .map_err(|e| DmarcError::extraction(path, format!("{}: {e}", member.name())))?;
        out.flush().map_err(|e| DmarcError::io(&target, e))?;
        written += 1;
    }
    Ok(written)
}

/// Decompresses a `.gz` file to `destination/<basename without .gz>`.
/// An existing file with that name is overwritten.
///
/// # Errors
/// Returns error if the stream is corrupt or writing fails.
pub fn extract_gzip(path: &Path, destination: &Path) -> Result<PathBuf> {
    let target = destination.join(gzip_output_name(path));

    let file = File::open(path).map_err(|e| DmarcError::extraction(path, e.to_string()))?;
    let mut decoder = GzDecoder::new(BufReader::new(file));

    debug!(archive = %path.display(), output = %target.display(), "gunzipping");
    let mut out = create_output(&target)?;
    io::copy(&mut decoder, &mut out).map_err(|e| DmarcError::extraction(path, e.to_string()))?;
    out.flush().map_err(|e| DmarcError::io(&target, e))?;
    Ok(target)
}

/// Output file name for a gzip member: the basename with `.gz` stripped.
#[must_use]
pub fn gzip_output_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(GZIP_SUFFIX) {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

fn ensure_parent(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| DmarcError::io(parent, e))?;
    }
    Ok(())
}

fn create_output(target: &Path) -> Result<BufWriter<File>> {
    File::create(target)
        .map(BufWriter::new)
        .map_err(|e| DmarcError::io(target, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, members: &[(&str, &str)]) {
        let mut zw = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, body) in members {
            zw.start_file(*name, SimpleFileOptions::default()).unwrap();
            zw.write_all(body.as_bytes()).unwrap();
        }
        zw.finish().unwrap();
    }

    fn write_gz(path: &Path, body: &str) {
        let mut enc = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        enc.write_all(body.as_bytes()).unwrap();
        enc.finish().unwrap();
    }

    #[test]
    fn test_gzip_output_name() {
        assert_eq!(gzip_output_name(Path::new("/in/report.xml.gz")), "report.xml");
        assert_eq!(gzip_output_name(Path::new("plain.gz")), "plain");
    }

    #[test]
    fn test_zip_preserves_member_paths() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let zip = src.path().join("r.zip");
        write_zip(&zip, &[("top.xml", "<a/>"), ("inner/dir/deep.xml", "<b/>")]);

        let n = extract_zip(&zip, dst.path()).unwrap();
        assert_eq!(n, 2);
        assert_eq!(fs::read_to_string(dst.path().join("top.xml")).unwrap(), "<a/>");
        assert_eq!(
            fs::read_to_string(dst.path().join("inner/dir/deep.xml")).unwrap(),
            "<b/>"
        );
    }

    #[test]
    fn test_gzip_collision_overwrites() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("a")).unwrap();
        fs::create_dir_all(src.path().join("b")).unwrap();
        write_gz(&src.path().join("a/same.xml.gz"), "first");
        write_gz(&src.path().join("b/same.xml.gz"), "second");

        let set = ArchiveSet {
            zips: vec![],
            gzips: vec![src.path().join("a/same.xml.gz"), src.path().join("b/same.xml.gz")],
        };
        let stats = extract(&set, dst.path()).unwrap();
        assert_eq!(stats.gzip_files, 2);
        assert_eq!(fs::read_to_string(dst.path().join("same.xml")).unwrap(), "second");
    }

    #[test]
    fn test_corrupt_zip_is_extraction_error() {
        let src = TempDir::new().unwrap();
        let bad = src.path().join("bad.zip");
        fs::write(&bad, b"definitely not a zip").unwrap();
        let set = ArchiveSet {
            zips: vec![bad],
            gzips: vec![],
        };
        assert!(matches!(
            extract(&set, src.path()),
            Err(DmarcError::Extraction { .. })
        ));
    }

    #[test]
    fn test_corrupt_gzip_is_extraction_error() {
        let src = TempDir::new().unwrap();
        let bad = src.path().join("bad.xml.gz");
        fs::write(&bad, b"not gzip data at all").unwrap();
        assert!(matches!(
            extract_gzip(&bad, src.path()),
            Err(DmarcError::Extraction { .. })
        ));
    }

    #[test]
    fn test_destination_is_created() {
        let src = TempDir::new().unwrap();
        let gz = src.path().join("r.xml.gz");
        write_gz(&gz, "<feedback/>");
        let dst = src.path().join("work/sub");
        let set = ArchiveSet {
            zips: vec![],
            gzips: vec![gz],
        };
        extract(&set, &dst).unwrap();
        assert!(dst.join("r.xml").is_file());
    }
}
