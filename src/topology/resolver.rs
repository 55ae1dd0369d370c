//! Collapse endpoints that reach the same process under different names.
//!
//! A node can appear once per hostname it answers to, for example by short
//! name in the replica set config and by FQDN in the shard map. Endpoints are
//! grouped by resolved `ip:port`; each group keeps its first candidate.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};

use log::{debug, info, warn};

use crate::models::{ClusterNode, ClusterTopology};
use crate::topology::endpoint::parse_endpoint;

/// Hostname to IPv4 lookup.
#[cfg_attr(test, mockall::automock)]
pub trait DnsResolver {
    fn lookup_ipv4(&self, hostname: &str) -> io::Result<Vec<Ipv4Addr>>;
}

/// Resolver backed by the operating system's name service.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl DnsResolver for SystemResolver {
    fn lookup_ipv4(&self, hostname: &str) -> io::Result<Vec<Ipv4Addr>> {
        let mut addrs = Vec::new();
        for addr in (hostname, 0u16).to_socket_addrs()? {
            if let SocketAddr::V4(v4) = addr {
                if !addrs.contains(v4.ip()) {
                    addrs.push(*v4.ip());
                }
            }
        }
        Ok(addrs)
    }
}

/// Candidates sharing one resolved address, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointGroup {
    /// `ip:port`
    pub address: String,
    /// `host:port` strings resolving to `address`
    pub candidates: Vec<String>,
}

/// Group the topology's endpoints by resolved `ip:port`.
///
/// Nodes whose lookup fails are left out with a warning.
pub fn group_endpoints(topology: &ClusterTopology, dns: &dyn DnsResolver) -> Vec<EndpointGroup> {
    let mut groups: Vec<EndpointGroup> = Vec::new();

    for node in &topology.nodes {
        let endpoint = node.endpoint();
        let ips = match dns.lookup_ipv4(&node.hostname) {
            Ok(ips) => ips,
            Err(e) => {
                warn!("Could not resolve {}, dropping it: {}", node.hostname, e);
                continue;
            }
        };
        if ips.is_empty() {
            warn!("{} has no IPv4 address, dropping it", node.hostname);
            continue;
        }

        for ip in ips {
            let address = format!("{}:{}", ip, node.port);
            match groups.iter_mut().find(|g| g.address == address) {
                Some(group) => {
                    if !group.candidates.contains(&endpoint) {
                        group.candidates.push(endpoint.clone());
                    }
                }
                None => groups.push(EndpointGroup {
                    address,
                    candidates: vec![endpoint.clone()],
                }),
            }
        }
    }

    groups
}

/// Replacement topology with one node per distinct reachable address.
///
/// The deployment kind is preserved and no node outside the input is ever
/// introduced. Running it on already unique input returns that input.
pub fn resolve_unique_endpoints(
    topology: &ClusterTopology,
    dns: &dyn DnsResolver,
) -> ClusterTopology {
    let mut nodes: Vec<ClusterNode> = Vec::new();

    for group in group_endpoints(topology, dns) {
        let Some(first) = group.candidates.first() else {
            warn!("No endpoint candidates for {}", group.address);
            continue;
        };
        match parse_endpoint(first) {
            Ok(node) => {
                if nodes.contains(&node) {
                    continue;
                }
                if group.candidates.len() > 1 {
                    debug!(
                        "{} reached as {:?}, keeping {}",
                        group.address, group.candidates, first
                    );
                }
                nodes.push(node);
            }
            Err(e) => warn!("Skipping endpoint {}: {}", first, e),
        }
    }

    info!(
        "Resolved {} endpoints to {} unique nodes",
        topology.len(),
        nodes.len()
    );
    ClusterTopology::new(topology.kind, nodes)
}
