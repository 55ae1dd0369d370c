//! Copying files off remote nodes with rsync.
//!
//! A [`CopyJob`] copies a whole directory. A [`PatternCopyJob`] copies only
//! the files whose names start with a given prefix. The pattern mode has to
//! go through a shell, because the include filter's wildcard is written for
//! the shell to pass through intact, so its invocation is a shell script
//! rather than a direct argument vector. Both run through a
//! [`TransferProvider`].

pub mod copy_job;
pub mod pattern;
pub mod rsync;

pub use copy_job::{CopyDestination, CopyJob, CopySource, CopyState};
pub use pattern::{shell_quote, PatternCopyJob};
pub use rsync::RsyncProvider;

use crate::error::CollectorResult;

/// How a transfer process is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferInvocation {
    /// Program started with an explicit argument vector
    Direct { program: String, args: Vec<String> },
    /// Script interpreted by `shell -c`
    Shell { shell: String, script: String },
}

impl TransferInvocation {
    pub fn program(&self) -> &str {
        match self {
            TransferInvocation::Direct { program, .. } => program,
            TransferInvocation::Shell { shell, .. } => shell,
        }
    }

    pub fn args(&self) -> Vec<String> {
        match self {
            TransferInvocation::Direct { args, .. } => args.clone(),
            TransferInvocation::Shell { script, .. } => vec!["-c".to_string(), script.clone()],
        }
    }

    /// Printable command line for logs.
    pub fn display(&self) -> String {
        match self {
            TransferInvocation::Direct { program, args } => {
                format!("{} {}", program, args.join(" "))
            }
            TransferInvocation::Shell { shell, script } => format!("{} -c \"{}\"", shell, script),
        }
    }
}

/// Everything the transfer process printed, and whether it exited cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub success: bool,
}

/// Runs a transfer process to completion.
///
/// `Err` means the process could not be started, its output could not be
/// read, or it had to be killed. A process that ran and exited non-zero is
/// reported through [`TransferOutput::success`].
#[cfg_attr(test, mockall::automock)]
pub trait TransferProvider {
    fn run(&self, invocation: &TransferInvocation) -> CollectorResult<TransferOutput>;
}
