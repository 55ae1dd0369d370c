use clap::Parser;
use std::path::PathBuf;

use crate::constants::DEFAULT_OUTPUT_ROOT;

/// Command-line arguments for the diag-collector tool.
///
/// Connection settings are asked for interactively; the flags only control
/// where outputs and the run log are written.
#[derive(Parser, Debug)]
#[clap(
    name = "diag-collector",
    about = "Collects diagnostics, FTDC metrics and logs from every node of a MongoDB cluster"
)]
pub struct Args {
    /// Root directory of all collected outputs
    #[clap(long, env = "DIAG_COLLECTOR_OUTPUT_ROOT", default_value = DEFAULT_OUTPUT_ROOT)]
    pub output_root: PathBuf,

    /// Directory the run log file is written to
    #[clap(long, env = "DIAG_COLLECTOR_LOG_DIR", default_value = ".")]
    pub log_dir: PathBuf,

    /// Verbose logging (also enabled by DIAG_COLLECTOR_DEBUG=1)
    #[clap(short, long)]
    pub verbose: bool,
}
