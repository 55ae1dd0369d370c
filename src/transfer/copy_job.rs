use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::constants::RSYNC_BIN;
use crate::error::{CollectorError, CollectorResult};
use crate::transfer::{TransferInvocation, TransferProvider};

/// Where files are copied from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySource {
    pub is_local: bool,
    pub path: String,
    pub hostname: String,
    pub username: Option<String>,
}

impl CopySource {
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            is_local: true,
            path: path.into(),
            hostname: String::new(),
            username: None,
        }
    }

    pub fn remote(
        hostname: impl Into<String>,
        username: Option<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            is_local: false,
            path: path.into(),
            hostname: hostname.into(),
            username,
        }
    }

    /// Same source with a trailing slash, so rsync copies the directory's
    /// contents instead of the directory itself.
    pub fn directory_contents(mut self) -> Self {
        if !self.path.ends_with('/') {
            self.path.push('/');
        }
        self
    }

    /// rsync source argument: `path`, `host:path` or `user@host:path`. The
    /// path is used verbatim.
    pub fn rsync_spec(&self) -> String {
        if self.is_local {
            return self.path.clone();
        }
        match self.username.as_deref().filter(|u| !u.is_empty()) {
            Some(user) => format!("{}@{}:{}", user, self.hostname, self.path),
            None => format!("{}:{}", self.hostname, self.path),
        }
    }
}

/// Local directory files are copied into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyDestination {
    pub path: PathBuf,
}

impl CopyDestination {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyState {
    NotStarted,
    Progressing,
    Aborted,
    Completed,
}

impl CopyState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CopyState::Aborted | CopyState::Completed)
    }
}

/// One rsync run. A job is started at most once; a fresh job is created for
/// every file class copied from a node.
#[derive(Debug)]
pub struct CopyJob {
    source: CopySource,
    destination: CopyDestination,
    state: CopyState,
    output: Vec<u8>,
}

impl CopyJob {
    pub fn new(source: CopySource, destination: CopyDestination) -> Self {
        Self {
            source,
            destination,
            state: CopyState::NotStarted,
            output: Vec::new(),
        }
    }

    pub fn source(&self) -> &CopySource {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination.path
    }

    pub fn state(&self) -> CopyState {
        self.state
    }

    /// Captured stdout followed by stderr of the transfer process.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Whole-directory copy: `rsync -az --info=progress2 <source> <destination>`.
    pub fn invocation(&self) -> TransferInvocation {
        TransferInvocation::Direct {
            program: RSYNC_BIN.to_string(),
            args: vec![
                "-az".to_string(),
                "--info=progress2".to_string(),
                self.source.rsync_spec(),
                self.destination.path.to_string_lossy().to_string(),
            ],
        }
    }

    pub fn start(&mut self, provider: &dyn TransferProvider) -> CollectorResult<()> {
        let invocation = self.invocation();
        self.execute(provider, &invocation)
    }

    /// Drive the state machine through one run of `invocation`.
    pub(crate) fn execute(
        &mut self,
        provider: &dyn TransferProvider,
        invocation: &TransferInvocation,
    ) -> CollectorResult<()> {
        if self.state != CopyState::NotStarted {
            let phase = if self.state.is_terminal() {
                "already finished"
            } else {
                "still running"
            };
            return Err(CollectorError::Transfer(format!(
                "copy job from {} is {} ({:?})",
                self.source.rsync_spec(),
                phase,
                self.state
            )));
        }

        self.state = CopyState::Progressing;
        info!("Copying {}", invocation.display());

        let output = match provider.run(invocation) {
            Ok(output) => output,
            Err(e) => {
                self.state = CopyState::Aborted;
                warn!("Copy from {} aborted: {}", self.source.rsync_spec(), e);
                return Err(match e {
                    CollectorError::Transfer(reason) => CollectorError::Transfer(reason),
                    other => CollectorError::Transfer(other.to_string()),
                });
            }
        };

        self.output.extend_from_slice(&output.stdout);
        self.output.extend_from_slice(&output.stderr);

        if output.success {
            self.state = CopyState::Completed;
            debug!("Copy from {} completed", self.source.rsync_spec());
            Ok(())
        } else {
            self.state = CopyState::Aborted;
            Err(CollectorError::Transfer(format!(
                "rsync from {} exited with an error: {}",
                self.source.rsync_spec(),
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}
