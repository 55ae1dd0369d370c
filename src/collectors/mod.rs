//! Per-node collection.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             Orchestrator                │
//! │  free space → diagnostics → locality    │
//! ├─────────────────────────────────────────┤
//! │   Metrics (FTDC)     │      Logs        │
//! │                      │  log path guess  │
//! ├──────────────────────┴──────────────────┤
//! │   local: archive     remote: rsync to   │
//! │   in place           staging, archive   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Nodes are processed one after another in discovery order. Only a free
//! space or output directory failure stops the run; every other failure is
//! recorded in the node's report and the run moves on.
//!
//! ## Usage Example
//!
//! ```no_run
//! use diag_collector::collectors::orchestrator::Orchestrator;
//! use diag_collector::config::MongoCredentials;
//! use diag_collector::models::{ClusterNode, ClusterTopology, DeploymentKind};
//! use diag_collector::shell::MongoShell;
//! use diag_collector::topology::{LocalityClassifier, SystemInterfaces, SystemResolver};
//! use diag_collector::transfer::RsyncProvider;
//! use diag_collector::utils::disk_space::SysinfoDiskSpace;
//! use diag_collector::utils::output_dir::OutputLayout;
//!
//! # fn example() -> diag_collector::error::CollectorResult<()> {
//! let shell = MongoShell::detect(MongoCredentials::default())?;
//! let locality = LocalityClassifier::new(SystemResolver, SystemInterfaces);
//! let layout = OutputLayout::create("outputs", "prod")?;
//! let topology = ClusterTopology::new(
//!     DeploymentKind::Standalone,
//!     vec![ClusterNode::new("localhost", 27017)],
//! );
//!
//! let orchestrator = Orchestrator::new(
//!     &shell,
//!     &locality,
//!     &RsyncProvider,
//!     &SysinfoDiskSpace,
//!     &layout,
//!     None,
//! );
//! let summary = orchestrator.run_for_each_node(&topology)?;
//! println!("{} nodes fully collected", summary.fully_collected());
//! # Ok(())
//! # }
//! ```

/// Absolute log path reconstruction
pub mod log_path;

/// Log file archiving, local and remote
pub mod logs;

/// FTDC metrics archiving, local and remote
pub mod metrics;

/// Node by node collection driver
pub mod orchestrator;

pub use log_path::{estimate_log_path, LogPathEstimate};
pub use orchestrator::Orchestrator;
