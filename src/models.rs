use std::fmt;

use serde::{Deserialize, Serialize};

/// A single database process, identified by hostname and listen port.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClusterNode {
    pub hostname: String,
    pub port: u16,
}

impl ClusterNode {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
        }
    }

    /// `host:port` form used by the database and by the resolver
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }

    /// `host_port` form used for per-node output directories
    pub fn dir_name(&self) -> String {
        format!("{}_{}", self.hostname, self.port)
    }
}

impl fmt::Display for ClusterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hostname, self.port)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentKind {
    Standalone,
    ReplicaSet,
    Sharded,
}

impl fmt::Display for DeploymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentKind::Standalone => write!(f, "standalone"),
            DeploymentKind::ReplicaSet => write!(f, "replica set"),
            DeploymentKind::Sharded => write!(f, "sharded cluster"),
        }
    }
}

/// Ordered node list for one run. Order is discovery order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClusterTopology {
    pub kind: DeploymentKind,
    pub nodes: Vec<ClusterNode>,
}

impl ClusterTopology {
    pub fn new(kind: DeploymentKind, nodes: Vec<ClusterNode>) -> Self {
        Self { kind, nodes }
    }

    pub fn contains(&self, node: &ClusterNode) -> bool {
        self.nodes.iter().any(|n| n == node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
