use std::fs;
use std::path::Path;

use log::{error, info, warn};

use crate::config::RemoteCredentials;
use crate::constants::{
    DIAGNOSTIC_OUTPUT_NAME, MIN_FREE_SPACE_BYTES, STAGING_LOGS_DIR, STAGING_METRICS_DIR,
};
use crate::collectors::log_path::estimate_log_path;
use crate::collectors::logs::{archive_logs, stage_remote_logs, LogLocation};
use crate::collectors::metrics::{archive_metrics, stage_remote_metrics};
use crate::error::{CollectorError, CollectorResult};
use crate::models::{ClusterNode, ClusterTopology};
use crate::shell::{diagnostic_dir, system_log_settings, DiagnosticShell, ShellCommand};
use crate::topology::NodeLocality;
use crate::transfer::TransferProvider;
use crate::utils::disk_space::{ensure_free_space, DiskSpace};
use crate::utils::output_dir::OutputLayout;
use crate::utils::summary::{CollectionSummary, Locality, NodeReport, StepStatus};

/// Collects diagnostics, metrics and logs from every node of a topology.
pub struct Orchestrator<'a> {
    shell: &'a dyn DiagnosticShell,
    locality: &'a dyn NodeLocality,
    transfer: &'a dyn TransferProvider,
    disk: &'a dyn DiskSpace,
    layout: &'a OutputLayout,
    remote: Option<&'a RemoteCredentials>,
    min_free_bytes: u64,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        shell: &'a dyn DiagnosticShell,
        locality: &'a dyn NodeLocality,
        transfer: &'a dyn TransferProvider,
        disk: &'a dyn DiskSpace,
        layout: &'a OutputLayout,
        remote: Option<&'a RemoteCredentials>,
    ) -> Self {
        Self {
            shell,
            locality,
            transfer,
            disk,
            layout,
            remote,
            min_free_bytes: MIN_FREE_SPACE_BYTES,
        }
    }

    pub fn with_min_free_bytes(mut self, min_free_bytes: u64) -> Self {
        self.min_free_bytes = min_free_bytes;
        self
    }

    /// Process every node in order.
    ///
    /// Returns early only on fatal errors: not enough free space or a node
    /// directory that cannot be created. Everything else ends up in the
    /// node's report.
    pub fn run_for_each_node(&self, topology: &ClusterTopology) -> CollectorResult<CollectionSummary> {
        let mut summary = CollectionSummary::new(self.layout.cluster_name(), topology.kind);

        for (idx, node) in topology.nodes.iter().enumerate() {
            info!("Collecting from node {}/{}: {}", idx + 1, topology.len(), node);

            if let Err(e) = ensure_free_space(self.disk, self.layout.run_dir(), self.min_free_bytes) {
                error!("Stopping collection before {}: {}", node, e);
                return Err(e);
            }

            let node_dir = self.layout.node_dir(node)?;
            let report = self.collect_node(node, &node_dir);
            self.layout.remove_staging(node);
            summary.nodes.push(report);
        }

        info!(
            "Collection finished: {}/{} nodes fully collected",
            summary.fully_collected(),
            summary.nodes.len()
        );
        Ok(summary)
    }

    fn collect_node(&self, node: &ClusterNode, node_dir: &Path) -> NodeReport {
        let mut report = NodeReport::new(node.clone(), node_dir.to_path_buf());

        match self.run_diagnostics(node, node_dir) {
            Ok(status) => report.diagnostics = status,
            Err(e) => {
                warn!("Diagnostic script failed on {}, skipping node: {}", node, e);
                report.diagnostics = StepStatus::failed(&e);
                report.metrics = StepStatus::skipped("diagnostic script failed");
                report.logs = StepStatus::skipped("diagnostic script failed");
                return report;
            }
        }

        let (locality, remote) = self.placement(node);
        report.locality = locality;

        let diag_dir = diagnostic_dir(self.shell, node);

        report.metrics = match &diag_dir {
            Ok(dir) => self
                .collect_metrics(node, node_dir, dir, remote)
                .unwrap_or_else(|e| {
                    warn!("Metrics collection failed on {}: {}", node, e);
                    StepStatus::failed(e)
                }),
            Err(e) => {
                warn!("No diagnostic directory for {}, skipping metrics: {}", node, e);
                StepStatus::failed(e)
            }
        };

        report.logs = self
            .collect_logs(node, node_dir, diag_dir.as_deref().unwrap_or(""), remote)
            .unwrap_or_else(|e| {
                warn!("Log collection failed on {}: {}", node, e);
                StepStatus::failed(e)
            });

        report
    }

    /// Decide where a node's files are read from.
    ///
    /// Without an SSH user every node is handled as local, whatever the
    /// classifier says; the files are then expected on this machine.
    fn placement(&self, node: &ClusterNode) -> (Locality, Option<&'a RemoteCredentials>) {
        let classified = self.locality.is_local(&node.hostname);
        match (classified, self.remote) {
            (Ok(true), _) => (Locality::Local, None),
            (Ok(false), Some(remote)) => (Locality::Remote, Some(remote)),
            (Err(e), Some(remote)) => {
                warn!("Could not classify {}, assuming it is remote: {}", node, e);
                (Locality::AssumedRemote, Some(remote))
            }
            (Ok(false), None) => {
                warn!(
                    "{} does not look local but no SSH user was given, reading its files locally",
                    node
                );
                (Locality::AssumedLocal, None)
            }
            (Err(e), None) => {
                warn!("Could not classify {}, assuming it is local: {}", node, e);
                (Locality::AssumedLocal, None)
            }
        }
    }

    fn run_diagnostics(&self, node: &ClusterNode, node_dir: &Path) -> CollectorResult<StepStatus> {
        let output = self.shell.run(node, ShellCommand::DiagnosticScript)?;
        if !output.success {
            return Err(CollectorError::Collection(format!(
                "diagnostic script exited with an error: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let target = node_dir.join(DIAGNOSTIC_OUTPUT_NAME);
        fs::write(&target, &output.stdout)?;
        info!("Wrote diagnostics for {} to {}", node, target.display());
        Ok(StepStatus::Completed {
            output: target,
            files: 1,
        })
    }

    fn collect_metrics(
        &self,
        node: &ClusterNode,
        node_dir: &Path,
        diag_dir: &str,
        remote: Option<&RemoteCredentials>,
    ) -> CollectorResult<StepStatus> {
        match remote {
            None => archive_metrics(Path::new(diag_dir), node_dir),
            Some(remote) => {
                let staging = self.layout.staging_dir(node, STAGING_METRICS_DIR)?;
                stage_remote_metrics(node, remote, diag_dir, &staging, self.transfer)?;
                archive_metrics(&staging, node_dir)
            }
        }
    }

    fn collect_logs(
        &self,
        node: &ClusterNode,
        node_dir: &Path,
        diag_dir: &str,
        remote: Option<&RemoteCredentials>,
    ) -> CollectorResult<StepStatus> {
        let settings = system_log_settings(self.shell, node)?;
        let Some(raw_path) = settings.file_path() else {
            warn!(
                "{} does not log to a file ({:?}), skipping logs",
                node, settings.destination
            );
            return Ok(StepStatus::skipped("log destination is not a file"));
        };

        let estimate = estimate_log_path(raw_path, diag_dir);
        if !estimate.resolved_path.starts_with('/') {
            return Err(CollectorError::Collection(format!(
                "cannot place relative log path {} without a diagnostic directory",
                estimate.raw_configured_path
            )));
        }
        let location = LogLocation::from_path(&estimate.resolved_path)?;

        match remote {
            None => archive_logs(&location.directory_path(), &location, node_dir),
            Some(remote) => {
                let staging = self.layout.staging_dir(node, STAGING_LOGS_DIR)?;
                stage_remote_logs(node, remote, &location, &staging, self.transfer)?;
                archive_logs(&staging, &location, node_dir)
            }
        }
    }
}
