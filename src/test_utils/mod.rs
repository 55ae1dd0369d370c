//! Test utilities for diag-collector
//!
//! Fixtures for on-disk database layouts and helpers to inspect the
//! archives the collectors write.

#![cfg(test)]

use std::fs;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tempfile::TempDir;

/// A fake database path: `<tmp>/diagnostic.data/metrics.*` plus a log file
/// and one rotated copy directly under `<tmp>`.
pub struct FakeDbPath {
    pub dir: TempDir,
}

impl FakeDbPath {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let diag = dir.path().join("diagnostic.data");
        fs::create_dir(&diag).expect("diagnostic dir");
        fs::write(diag.join("metrics.2024-03-22T08-00-00Z-00000"), b"ftdc chunk").expect("metrics");
        fs::write(diag.join("metrics.interim"), b"interim").expect("interim");
        fs::write(dir.path().join("mongod.log"), b"{\"msg\":\"started\"}\n").expect("log");
        fs::write(dir.path().join("mongod.log.2024-03-21T00-00-00"), b"old\n").expect("rotated");
        fs::write(dir.path().join("mongod.lock"), b"4242").expect("lock");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn diagnostic_dir(&self) -> PathBuf {
        self.dir.path().join("diagnostic.data")
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("mongod.log")
    }
}

/// Sorted entry names of a `.tar.gz` file.
pub fn archive_entries(archive: &Path) -> Vec<String> {
    let file = fs::File::open(archive).expect("open archive");
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    let mut names: Vec<String> = archive
        .entries()
        .expect("entries")
        .map(|entry| {
            entry
                .expect("entry")
                .path()
                .expect("entry path")
                .to_string_lossy()
                .to_string()
        })
        .collect();
    names.sort();
    names
}
