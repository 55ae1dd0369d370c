use std::env;
use std::path::PathBuf;
use std::process::Command;

use log::{debug, info};

use crate::config::MongoCredentials;
use crate::constants::{LEGACY_MONGO_BIN, LEGACY_SCRIPT_PATH, MONGOSH_BIN, MONGOSH_SCRIPT_PATH};
use crate::error::{CollectorError, CollectorResult};
use crate::models::ClusterNode;
use crate::shell::{DiagnosticShell, ShellCommand, ShellFlavor, ShellOutput};

/// Locate `name` in the directories listed in `PATH`.
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Shell client found on this machine together with the connection settings
/// used for every node.
pub struct MongoShell {
    bin_path: PathBuf,
    flavor: ShellFlavor,
    script_path: PathBuf,
    credentials: MongoCredentials,
}

impl MongoShell {
    /// Detect `mongosh` first and fall back to the legacy `mongo` client.
    pub fn detect(credentials: MongoCredentials) -> CollectorResult<Self> {
        if let Some(path) = find_in_path(MONGOSH_BIN) {
            info!("Using mongosh at {}", path.display());
            return Ok(Self::new(
                path,
                ShellFlavor::Mongosh,
                PathBuf::from(MONGOSH_SCRIPT_PATH),
                credentials,
            ));
        }
        if let Some(path) = find_in_path(LEGACY_MONGO_BIN) {
            info!("Using legacy mongo shell at {}", path.display());
            return Ok(Self::new(
                path,
                ShellFlavor::Legacy,
                PathBuf::from(LEGACY_SCRIPT_PATH),
                credentials,
            ));
        }
        Err(CollectorError::Precondition(
            "could not find mongosh or the legacy mongo shell on PATH".to_string(),
        ))
    }

    pub fn new(
        bin_path: PathBuf,
        flavor: ShellFlavor,
        script_path: PathBuf,
        credentials: MongoCredentials,
    ) -> Self {
        Self {
            bin_path,
            flavor,
            script_path,
            credentials,
        }
    }

    /// Arguments for one invocation, in the order the client expects them.
    pub fn build_args(&self, node: &ClusterNode, command: ShellCommand) -> Vec<String> {
        let mut args = vec!["--quiet".to_string(), "--norc".to_string()];

        if self.credentials.has_auth() {
            args.push("-u".to_string());
            args.push(self.credentials.username.clone().unwrap_or_default());
            args.push("-p".to_string());
            args.push(self.credentials.password.clone().unwrap_or_default());
        }

        if self.flavor == ShellFlavor::Mongosh && command.wants_canonical_json() {
            args.push("--json=canonical".to_string());
        }

        args.push(self.credentials.connection_uri(node));

        match command.eval_payload(self.flavor) {
            Some(payload) => {
                args.push("--eval".to_string());
                args.push(payload.to_string());
            }
            None => args.push(self.script_path.to_string_lossy().to_string()),
        }

        args
    }
}

impl DiagnosticShell for MongoShell {
    fn flavor(&self) -> ShellFlavor {
        self.flavor
    }

    fn run(&self, node: &ClusterNode, command: ShellCommand) -> CollectorResult<ShellOutput> {
        debug!("Running {:?} against {}", command, node);

        let output = Command::new(&self.bin_path)
            .args(self.build_args(node, command))
            .output()
            .map_err(|e| {
                CollectorError::Collection(format!(
                    "failed to launch {}: {}",
                    self.bin_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            debug!(
                "{:?} against {} exited with {}: {}",
                command,
                node,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(ShellOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            success: output.status.success(),
        })
    }
}
