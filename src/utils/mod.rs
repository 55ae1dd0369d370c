//! Filesystem helpers used by the collectors.
//!
//! ## Components
//!
//! - **Archive**: `.tar.gz` archives of files matching a name pattern
//! - **Disk space**: free space checks before each node is collected
//! - **Output layout**: run, node and staging directories
//! - **Summary**: per-run JSON report of every node's outcome
//!
//! ## Example
//!
//! ```no_run
//! use diag_collector::utils::archive::archive_to_file;
//! use std::path::Path;
//!
//! # fn example() -> diag_collector::error::CollectorResult<()> {
//! let stats = archive_to_file(
//!     Path::new("/data/db/diagnostic.data"),
//!     "^metrics.*",
//!     Path::new("/tmp/ftdcarchive.tar.gz"),
//! )?;
//! println!("Archived {} files", stats.files);
//! # Ok(())
//! # }
//! ```

/// Pattern-filtered tar.gz archive writer
pub mod archive;

/// Free space checks on the output filesystem
pub mod disk_space;

/// Run, node and staging directory layout
pub mod output_dir;

/// Collection summary generation and reporting
pub mod summary;
