//! gzip-compressed tar archives of the files under a directory whose base
//! names match a pattern.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, info, warn};
use regex::Regex;
use walkdir::WalkDir;

use crate::error::{CollectorError, CollectorResult};

/// What went into an archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    pub files: usize,
    pub bytes: u64,
}

/// Archive every regular file below `source_dir` whose base name matches
/// `pattern` into `writer` as a `.tar.gz` stream.
///
/// Entry names are relative to `source_dir`. Symlinks are not followed.
pub fn archive_matching<W: Write>(
    source_dir: &Path,
    pattern: &str,
    writer: W,
) -> CollectorResult<ArchiveStats> {
    let name_re = Regex::new(pattern).map_err(|e| {
        CollectorError::Collection(format!("invalid archive pattern '{}': {}", pattern, e))
    })?;

    if !source_dir.is_dir() {
        return Err(CollectorError::Collection(format!(
            "archive source {} is not a directory",
            source_dir.display()
        )));
    }

    let encoder = GzEncoder::new(writer, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    let mut stats = ArchiveStats::default();

    for entry in WalkDir::new(source_dir).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", source_dir.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !name_re.is_match(&name) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|e| CollectorError::Collection(e.to_string()))?;
        debug!("Adding {} to archive", relative.display());
        builder.append_path_with_name(entry.path(), relative)?;

        stats.files += 1;
        stats.bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
    }

    builder.into_inner()?.finish()?.flush()?;
    Ok(stats)
}

/// [`archive_matching`] into a new file at `target`. A partially written
/// archive is removed when archiving fails.
pub fn archive_to_file(
    source_dir: &Path,
    pattern: &str,
    target: &Path,
) -> CollectorResult<ArchiveStats> {
    let file = File::create(target)?;
    match archive_matching(source_dir, pattern, BufWriter::new(file)) {
        Ok(stats) => {
            info!(
                "Archived {} files ({} bytes) from {} into {}",
                stats.files,
                stats.bytes,
                source_dir.display(),
                target.display()
            );
            Ok(stats)
        }
        Err(e) => {
            let _ = fs::remove_file(target);
            Err(e)
        }
    }
}
