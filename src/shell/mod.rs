//! Database shell collaborator.
//!
//! The collector never speaks the database wire protocol. Every command is
//! run through `mongosh` or the legacy `mongo` client and the printed result
//! is parsed. The [`DiagnosticShell`] trait is the seam used by topology
//! discovery and the orchestrator, so both can be exercised without a
//! running cluster.

use crate::error::CollectorResult;
use crate::models::ClusterNode;

/// Extended JSON normalization for legacy shell output
pub mod ejson;

/// Shell binary detection and process execution
pub mod mongo_shell;

/// Typed helpers for the per-node queries used during collection
pub mod queries;

pub use mongo_shell::MongoShell;
pub use queries::{diagnostic_dir, system_log_settings, SystemLogSettings};

/// Which client is executing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlavor {
    /// `mongosh`: can emit canonical extended JSON, but exits non-zero on
    /// benign command errors such as "sharding not enabled"
    Mongosh,
    /// Legacy `mongo`: prints shell-style extended types, exit code is reliable
    Legacy,
}

/// Commands the collector knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellCommand {
    /// `getShardMap`, succeeds only against a mongos or shard member
    ShardMap,
    /// `isMaster` host list printed as a JSON array
    Membership,
    /// `diagnosticDataCollectionDirectoryPath` server parameter
    DiagnosticDirPath,
    /// `systemLog` section of the parsed command line options
    SystemLogSettings,
    /// The full diagnostic data collection script
    DiagnosticScript,
}

impl ShellCommand {
    /// JavaScript passed to `--eval`, or `None` for commands run from a script file.
    pub fn eval_payload(&self, flavor: ShellFlavor) -> Option<&'static str> {
        match (self, flavor) {
            (ShellCommand::ShardMap, ShellFlavor::Mongosh) => {
                Some("db.adminCommand({getShardMap: 1})")
            }
            (ShellCommand::ShardMap, ShellFlavor::Legacy) => {
                Some("printjson(db.adminCommand({getShardMap: 1}))")
            }
            (ShellCommand::Membership, _) => {
                Some("print(JSON.stringify(db.adminCommand({isMaster: 1}).hosts || []))")
            }
            (ShellCommand::DiagnosticDirPath, _) => Some(
                "print(db.adminCommand({getParameter: 1, diagnosticDataCollectionDirectoryPath: 1})\
                 .diagnosticDataCollectionDirectoryPath)",
            ),
            (ShellCommand::SystemLogSettings, _) => Some(
                "print(JSON.stringify(db.adminCommand({getCmdLineOpts: 1}).parsed.systemLog || {}))",
            ),
            (ShellCommand::DiagnosticScript, _) => None,
        }
    }

    /// Only the shard map probe asks `mongosh` for canonical extended JSON.
    pub fn wants_canonical_json(&self) -> bool {
        matches!(self, ShellCommand::ShardMap)
    }
}

/// Result of one shell invocation. A fresh value per call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub success: bool,
}

impl ShellOutput {
    pub fn ok(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: Vec::new(),
            success: true,
        }
    }

    pub fn failed(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: Vec::new(),
            success: false,
        }
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }
}

/// Runs database commands against a single node.
///
/// `Err` is reserved for failures to launch the client. A client that ran
/// and exited non-zero is reported through [`ShellOutput::success`] so the
/// caller can apply flavor-specific rules.
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticShell {
    fn flavor(&self) -> ShellFlavor;
    fn run(&self, node: &ClusterNode, command: ShellCommand) -> CollectorResult<ShellOutput>;
}
