//! Topology discovery from a single seed node.
//!
//! Discovery is a two phase probe. The shard map is asked for first; a reply
//! carrying a well formed `hosts` map means the seed belongs to a sharded
//! cluster. Otherwise the membership probe decides between a replica set and
//! a standalone server.
//!
//! Each probe returns its own typed reply. Nothing is carried over from one
//! probe to the next.

use log::{debug, info, warn};
use serde_json::Value;

use crate::error::{CollectorError, CollectorResult};
use crate::models::{ClusterNode, ClusterTopology, DeploymentKind};
use crate::shell::ejson::normalize_extended_types;
use crate::shell::{DiagnosticShell, ShellCommand, ShellFlavor};
use crate::topology::endpoint::{has_endpoint_shape, parse_endpoint};

/// Parsed reply of the shard map probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShardMapReply {
    /// Members listed in the `hosts` map, sorted by endpoint
    Sharded(Vec<ClusterNode>),
    /// Anything else, including error documents and unparseable output
    NotSharded,
}

impl ShardMapReply {
    /// Interpret the printed shard map.
    ///
    /// The reply counts as a shard map only when it is a JSON object whose
    /// `hosts` member is a non-empty object, every key has the `host:port`
    /// shape and every value is a non-empty string. Once that holds, a key
    /// whose port is not a number is a fatal configuration error.
    pub fn parse(raw: &str) -> CollectorResult<Self> {
        let normalized = normalize_extended_types(raw);
        let value: Value = match serde_json::from_str(normalized.trim()) {
            Ok(value) => value,
            Err(e) => {
                debug!("Shard map reply is not JSON: {}", e);
                return Ok(ShardMapReply::NotSharded);
            }
        };

        let hosts = match value.get("hosts").and_then(Value::as_object) {
            Some(hosts) if !hosts.is_empty() => hosts,
            _ => return Ok(ShardMapReply::NotSharded),
        };

        let well_formed = hosts.iter().all(|(endpoint, shard)| {
            has_endpoint_shape(endpoint) && shard.as_str().map_or(false, |s| !s.is_empty())
        });
        if !well_formed {
            debug!("Shard map hosts are not all host:port keys with shard names");
            return Ok(ShardMapReply::NotSharded);
        }

        let nodes = hosts
            .keys()
            .map(|endpoint| parse_endpoint(endpoint))
            .collect::<CollectorResult<Vec<_>>>()?;
        Ok(ShardMapReply::Sharded(nodes))
    }
}

/// Parsed reply of the membership probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipReply {
    /// No replica set configuration: the server stands alone
    Standalone,
    /// Replica set members in the order the server reported them
    Members(Vec<ClusterNode>),
}

impl MembershipReply {
    /// Interpret the printed `hosts` array. Empty output, `null` and `[]` all
    /// mean standalone.
    pub fn parse(raw: &str) -> CollectorResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "null" || trimmed == "undefined" {
            return Ok(MembershipReply::Standalone);
        }

        let hosts: Vec<String> = serde_json::from_str(trimmed).map_err(|e| {
            CollectorError::Probe(format!("unreadable membership reply '{}': {}", trimmed, e))
        })?;
        if hosts.is_empty() {
            return Ok(MembershipReply::Standalone);
        }

        let members = hosts
            .iter()
            .map(|endpoint| parse_endpoint(endpoint))
            .collect::<CollectorResult<Vec<_>>>()?;
        Ok(MembershipReply::Members(members))
    }
}

/// Discovers every member of the cluster the seed node belongs to.
pub struct TopologyDiscovery<'a> {
    shell: &'a dyn DiagnosticShell,
}

impl<'a> TopologyDiscovery<'a> {
    pub fn new(shell: &'a dyn DiagnosticShell) -> Self {
        Self { shell }
    }

    pub fn discover(&self, seed: &ClusterNode) -> CollectorResult<ClusterTopology> {
        info!("Discovering cluster topology from seed {}", seed);

        if let ShardMapReply::Sharded(mut nodes) = self.probe_shard_map(seed)? {
            // The shard map never lists the mongos we are connected to.
            if !nodes.contains(seed) {
                nodes.push(seed.clone());
            }
            info!("Found sharded cluster with {} nodes", nodes.len());
            return Ok(ClusterTopology::new(DeploymentKind::Sharded, nodes));
        }

        match self.probe_membership(seed)? {
            MembershipReply::Standalone => {
                info!("Found standalone server {}", seed);
                Ok(ClusterTopology::new(
                    DeploymentKind::Standalone,
                    vec![seed.clone()],
                ))
            }
            MembershipReply::Members(members) => {
                info!("Found replica set with {} members", members.len());
                Ok(ClusterTopology::new(DeploymentKind::ReplicaSet, members))
            }
        }
    }

    fn probe_shard_map(&self, seed: &ClusterNode) -> CollectorResult<ShardMapReply> {
        let output = self
            .shell
            .run(seed, ShellCommand::ShardMap)
            .map_err(|e| CollectorError::Probe(format!("shard map probe on {}: {}", seed, e)))?;

        if !output.success {
            match self.shell.flavor() {
                // mongosh exits non-zero when sharding is simply not enabled
                ShellFlavor::Mongosh => {
                    debug!("Ignoring non-zero mongosh exit for shard map probe on {}", seed)
                }
                ShellFlavor::Legacy => {
                    return Err(CollectorError::Probe(format!(
                        "shard map probe on {} failed: {}",
                        seed,
                        String::from_utf8_lossy(&output.stderr).trim()
                    )))
                }
            }
        }

        ShardMapReply::parse(&output.stdout_lossy())
    }

    fn probe_membership(&self, seed: &ClusterNode) -> CollectorResult<MembershipReply> {
        let output = self
            .shell
            .run(seed, ShellCommand::Membership)
            .map_err(|e| CollectorError::Probe(format!("membership probe on {}: {}", seed, e)))?;

        if !output.success {
            warn!(
                "Membership probe on {} exited non-zero: {}",
                seed,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(CollectorError::Probe(format!(
                "membership probe on {} failed",
                seed
            )));
        }

        MembershipReply::parse(&output.stdout_lossy())
    }
}
