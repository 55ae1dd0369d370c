use std::fs::{self, File};
use std::io;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};

use diag_collector::cli::Args;
use diag_collector::collectors::Orchestrator;
use diag_collector::config::{debug_logging_requested, Prompter};
use diag_collector::constants::{RUN_LOG_PREFIX, SUMMARY_FILE_NAME};
use diag_collector::models::ClusterTopology;
use diag_collector::shell::MongoShell;
use diag_collector::topology::{
    resolve_unique_endpoints, LocalityClassifier, SystemInterfaces, SystemResolver,
    TopologyDiscovery,
};
use diag_collector::transfer::RsyncProvider;
use diag_collector::utils::disk_space::SysinfoDiskSpace;
use diag_collector::utils::output_dir::OutputLayout;

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose || debug_logging_requested(), &args.log_dir)?;

    if let Err(e) = run(&args) {
        error!("Collection aborted: {:#}", e);
        return Err(e);
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    info!("Starting cluster diagnostic collection");

    // Gather connection settings
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout(), true);
    let credentials = prompter
        .mongo_credentials()
        .context("Failed to read database credentials")?;
    let remote = prompter
        .remote_credentials()
        .context("Failed to read SSH user")?;

    let cluster_name = credentials.cluster_name.clone();
    let seed = credentials.seed_node();
    let shell = MongoShell::detect(credentials)?;

    // Discover the cluster
    let topology = discover_topology(&shell, &seed)?;

    // Prepare output directories
    let layout = OutputLayout::create(&args.output_root, &cluster_name)
        .context("Failed to create output directory")?;

    // Collect every node
    let locality = LocalityClassifier::new(SystemResolver, SystemInterfaces);
    let orchestrator = Orchestrator::new(
        &shell,
        &locality,
        &RsyncProvider,
        &SysinfoDiskSpace,
        &layout,
        remote.as_ref(),
    );
    let summary = orchestrator.run_for_each_node(&topology)?;

    // Write collection summary
    let summary_path = summary.write_to(layout.run_dir(), SUMMARY_FILE_NAME)?;
    info!("Collection summary written to {}", summary_path.display());

    info!(
        "Diagnostic collection completed: {}/{} nodes fully collected",
        summary.fully_collected(),
        summary.nodes.len()
    );
    Ok(())
}

/// Discover the topology from the seed and collapse duplicate endpoints.
fn discover_topology(
    shell: &MongoShell,
    seed: &diag_collector::models::ClusterNode,
) -> Result<ClusterTopology> {
    let discovered = TopologyDiscovery::new(shell)
        .discover(seed)
        .context("Failed to discover cluster topology")?;
    info!("Discovered {} with {} nodes", discovered.kind, discovered.len());

    let resolved = resolve_unique_endpoints(&discovered, &SystemResolver);
    if resolved.is_empty() {
        warn!("No discovered node could be resolved, using the discovered topology as is");
        return Ok(discovered);
    }
    for node in &resolved.nodes {
        info!("  {}", node);
    }
    Ok(resolved)
}

/// Initialize terminal logging plus a debug level run log file
fn initialize_logging(verbose: bool, log_dir: &Path) -> Result<()> {
    let term_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join(format!("{}_{}.log", RUN_LOG_PREFIX, Utc::now().timestamp()));
    let log_file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file {}", log_path.display()))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            term_level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Debug, Config::default(), log_file),
    ])
    .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;
    Ok(())
}
