use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ClusterNode, DeploymentKind};

/// Whether a node was collected from this machine or over SSH.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Locality {
    Local,
    Remote,
    /// Classification failed; the node was treated as remote
    AssumedRemote,
    /// No SSH user was given; the node was treated as local
    AssumedLocal,
    /// Not classified because an earlier step failed
    Unknown,
}

/// Outcome of one collection step for one node.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    NotRun,
    Completed { output: PathBuf, files: usize },
    Skipped { reason: String },
    Failed { error: String },
}

impl StepStatus {
    pub fn skipped(reason: impl Into<String>) -> Self {
        StepStatus::Skipped {
            reason: reason.into(),
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        StepStatus::Failed {
            error: error.to_string(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, StepStatus::Completed { .. })
    }
}

/// Per-node entry of the run summary.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeReport {
    pub node: ClusterNode,
    pub output_dir: PathBuf,
    pub locality: Locality,
    pub diagnostics: StepStatus,
    pub metrics: StepStatus,
    pub logs: StepStatus,
}

impl NodeReport {
    pub fn new(node: ClusterNode, output_dir: PathBuf) -> Self {
        Self {
            node,
            output_dir,
            locality: Locality::Unknown,
            diagnostics: StepStatus::NotRun,
            metrics: StepStatus::NotRun,
            logs: StepStatus::NotRun,
        }
    }
}

/// Summary of a collection run, written next to the node directories.
#[derive(Serialize, Debug, Clone)]
pub struct CollectionSummary {
    pub collection_id: String,
    pub cluster_name: String,
    pub deployment: DeploymentKind,
    pub collection_time: String,
    pub collector_version: String,
    pub nodes: Vec<NodeReport>,
}

impl CollectionSummary {
    pub fn new(cluster_name: &str, deployment: DeploymentKind) -> Self {
        Self {
            collection_id: Uuid::new_v4().to_string(),
            cluster_name: cluster_name.to_string(),
            deployment,
            collection_time: Utc::now().to_rfc3339(),
            collector_version: env!("CARGO_PKG_VERSION").to_string(),
            nodes: Vec::new(),
        }
    }

    /// Nodes whose metrics and logs were both archived.
    pub fn fully_collected(&self) -> usize {
        self.nodes
            .iter()
            .filter(|r| r.metrics.is_completed() && r.logs.is_completed())
            .count()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize collection summary to JSON")
    }

    /// Write the summary as `file_name` inside `dir` and return its path.
    pub fn write_to(&self, dir: &Path, file_name: &str) -> Result<PathBuf> {
        let path = dir.join(file_name);
        std::fs::write(&path, self.to_json()?)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        Ok(path)
    }
}
