//! Cluster topology: endpoint parsing, discovery from a seed node, collapsing
//! of multi-homed nodes, and local/remote classification.

pub mod classifier;
pub mod discovery;
pub mod endpoint;
pub mod interfaces;
pub mod resolver;

pub use classifier::{LocalityClassifier, NodeLocality};
pub use discovery::TopologyDiscovery;
pub use endpoint::parse_endpoint;
pub use interfaces::{InterfaceSource, SystemInterfaces};
pub use resolver::{resolve_unique_endpoints, DnsResolver, SystemResolver};
