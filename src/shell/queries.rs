use log::debug;
use serde::Deserialize;

use crate::error::{CollectorError, CollectorResult};
use crate::models::ClusterNode;
use crate::shell::{DiagnosticShell, ShellCommand};

/// `systemLog` section of a node's parsed command line options.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SystemLogSettings {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl SystemLogSettings {
    /// Log file path when the node writes its log to a file.
    pub fn file_path(&self) -> Option<&str> {
        match self.destination.as_deref() {
            Some("file") => self.path.as_deref().map(trim_quotes).filter(|p| !p.is_empty()),
            _ => None,
        }
    }
}

/// Strip surrounding whitespace and one pair of double quotes.
pub fn trim_quotes(s: &str) -> &str {
    let s = s.trim();
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

/// Diagnostic data directory of `node` as reported by the server.
pub fn diagnostic_dir(shell: &dyn DiagnosticShell, node: &ClusterNode) -> CollectorResult<String> {
    let output = shell.run(node, ShellCommand::DiagnosticDirPath)?;
    if !output.success {
        return Err(CollectorError::Collection(format!(
            "diagnostic directory query failed on {}",
            node
        )));
    }

    let path = trim_quotes(&output.stdout_lossy()).to_string();
    if path.is_empty() || path == "undefined" {
        return Err(CollectorError::Collection(format!(
            "{} did not report a diagnostic data directory",
            node
        )));
    }
    debug!("Diagnostic directory of {}: {}", node, path);
    Ok(path)
}

/// Log settings of `node`.
pub fn system_log_settings(
    shell: &dyn DiagnosticShell,
    node: &ClusterNode,
) -> CollectorResult<SystemLogSettings> {
    let output = shell.run(node, ShellCommand::SystemLogSettings)?;
    if !output.success {
        return Err(CollectorError::Collection(format!(
            "log settings query failed on {}",
            node
        )));
    }

    let settings: SystemLogSettings = serde_json::from_slice(&output.stdout).map_err(|e| {
        CollectorError::Collection(format!("unreadable log settings from {}: {}", node, e))
    })?;
    debug!("Log destination of {}: {:?}", node, settings.destination);
    Ok(settings)
}
