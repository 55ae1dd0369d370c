use std::path::Path;

use log::info;

use crate::config::RemoteCredentials;
use crate::constants::{METRICS_ARCHIVE_NAME, METRICS_FILE_PATTERN};
use crate::error::CollectorResult;
use crate::models::ClusterNode;
use crate::transfer::{CopyDestination, CopyJob, CopySource, TransferProvider};
use crate::utils::archive::archive_to_file;
use crate::utils::summary::StepStatus;

/// Archive the FTDC files found in `source_dir` into the node directory.
pub fn archive_metrics(source_dir: &Path, node_dir: &Path) -> CollectorResult<StepStatus> {
    let target = node_dir.join(METRICS_ARCHIVE_NAME);
    let stats = archive_to_file(source_dir, METRICS_FILE_PATTERN, &target)?;
    Ok(StepStatus::Completed {
        output: target,
        files: stats.files,
    })
}

/// Copy the contents of a remote node's diagnostic directory into `staging`.
pub fn stage_remote_metrics(
    node: &ClusterNode,
    remote: &RemoteCredentials,
    diagnostic_dir: &str,
    staging: &Path,
    transfer: &dyn TransferProvider,
) -> CollectorResult<()> {
    info!("Copying metrics from {}:{}", node.hostname, diagnostic_dir);
    let source = CopySource::remote(
        node.hostname.clone(),
        Some(remote.username.clone()),
        diagnostic_dir,
    )
    .directory_contents();
    let mut job = CopyJob::new(source, CopyDestination::new(staging));
    job.start(transfer)
}
