//! Global constants for the diag-collector application.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// Disk space
/// Minimum free space required on the output filesystem before each node (1GB)
pub const MIN_FREE_SPACE_BYTES: u64 = 1024 * 1024 * 1024;

// Connection defaults
/// Default seed host when the operator leaves it blank
pub const DEFAULT_SEED_HOST: &str = "localhost";

/// Default seed port when the operator leaves it blank
pub const DEFAULT_SEED_PORT: u16 = 27017;

/// Largest accepted value for any interactive input (16MB)
pub const MAX_INPUT_SIZE: usize = 16 * 1024 * 1024;

/// Length of the generated cluster name when none is given
pub const GENERATED_CLUSTER_NAME_LEN: usize = 10;

// Shell binaries and scripts
/// Modern database shell, preferred when present on PATH
pub const MONGOSH_BIN: &str = "mongosh";

/// Legacy database shell
pub const LEGACY_MONGO_BIN: &str = "mongo";

/// Diagnostic script used with the modern shell
pub const MONGOSH_SCRIPT_PATH: &str = "./assets/mongoWellnessChecker/mongoWellnessChecker.js";

/// Diagnostic script used with the legacy shell
pub const LEGACY_SCRIPT_PATH: &str = "./assets/getMongoData/getMongoData.js";

// Transfer
/// Synchronization tool used for remote copies
pub const RSYNC_BIN: &str = "rsync";

/// Shell used for pattern copies (wildcards are expanded by the shell)
pub const PATTERN_SHELL: &str = "bash";

// Output layout
/// Default root of all collected outputs
pub const DEFAULT_OUTPUT_ROOT: &str = "outputs";

/// Subdirectory of the output root holding staging directories
pub const TEMP_DIR_NAME: &str = "temp";

/// Diagnostic script output file name
pub const DIAGNOSTIC_OUTPUT_NAME: &str = "getMongoData.json";

/// Metrics (FTDC) archive file name
pub const METRICS_ARCHIVE_NAME: &str = "ftdcarchive.tar.gz";

/// Log archive file name
pub const LOG_ARCHIVE_NAME: &str = "logarchive.tar.gz";

/// Run summary file name
pub const SUMMARY_FILE_NAME: &str = "collection_summary.json";

/// Base name pattern of FTDC metrics files
pub const METRICS_FILE_PATTERN: &str = "^metrics.*";

/// Staging subdirectory for metrics files
pub const STAGING_METRICS_DIR: &str = "metrics";

/// Staging subdirectory for log files
pub const STAGING_LOGS_DIR: &str = "logs";

// Logging
/// Environment variable that switches on debug logging
pub const DEBUG_ENV_VAR: &str = "DIAG_COLLECTOR_DEBUG";

/// Prefix of the run log file name
pub const RUN_LOG_PREFIX: &str = "diag_collector";
