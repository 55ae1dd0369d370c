//! # diag-collector
//!
//! Collects diagnostic data from every node of a MongoDB deployment.
//!
//! ## Overview
//!
//! Starting from a single seed node the collector discovers the deployment
//! (standalone, replica set or sharded cluster), collapses nodes that are
//! reachable under several hostnames, and then visits each node in turn:
//!
//! 1. runs the diagnostic script and stores its JSON output
//! 2. decides whether the node runs on this machine
//! 3. archives the FTDC metrics and the server log, copying them with rsync
//!    over passwordless SSH first when the node is remote
//!
//! The database itself is only ever reached through `mongosh` or the legacy
//! `mongo` shell; no wire protocol is spoken here.
//!
//! ## Usage
//!
//! ```no_run
//! use diag_collector::config::MongoCredentials;
//! use diag_collector::shell::MongoShell;
//! use diag_collector::topology::{resolve_unique_endpoints, SystemResolver, TopologyDiscovery};
//!
//! # fn main() -> anyhow::Result<()> {
//! let credentials = MongoCredentials::default();
//! let seed = credentials.seed_node();
//! let shell = MongoShell::detect(credentials)?;
//!
//! let topology = TopologyDiscovery::new(&shell).discover(&seed)?;
//! let topology = resolve_unique_endpoints(&topology, &SystemResolver);
//! println!("{} with {} nodes", topology.kind, topology.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`config`]: Interactive credential prompts and validation
//! - [`models`]: Cluster nodes and topologies
//! - [`shell`]: Running commands through the database shell
//! - [`topology`]: Discovery, endpoint deduplication and locality
//! - [`transfer`]: rsync copy jobs for remote nodes
//! - [`collectors`]: Per-node collection and the orchestrator
//! - [`utils`]: Archives, disk space, output layout and run summary
//! - [`error`]: Error taxonomy
//! - [`constants`]: Application-wide constants
//!
//! ## Safety
//!
//! `unsafe` is limited to two libc calls sites on unix: interface
//! enumeration with `getifaddrs` and turning off terminal echo while the
//! password is typed.

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models and structures used throughout the application
pub mod models;

/// Error taxonomy and result alias
pub mod error;

/// Interactive credential collection and validation
pub mod config;

/// Database shell detection and command execution
pub mod shell;

/// Topology discovery, endpoint resolution and locality
pub mod topology;

/// rsync based copy jobs
pub mod transfer;

/// Per-node collection and orchestration
pub mod collectors;

/// Archive, disk space, output layout and summary helpers
pub mod utils;

/// Application-wide constants
pub mod constants;

/// Test fakes shared by unit tests
#[cfg(test)]
pub mod test_utils;
