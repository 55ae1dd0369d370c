use std::path::{Path, PathBuf};

use log::info;

use crate::config::RemoteCredentials;
use crate::constants::LOG_ARCHIVE_NAME;
use crate::error::{CollectorError, CollectorResult};
use crate::models::ClusterNode;
use crate::transfer::{CopyDestination, CopyJob, CopySource, PatternCopyJob, TransferProvider};
use crate::utils::archive::archive_to_file;
use crate::utils::summary::StepStatus;

/// Directory and base name of a node's current log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLocation {
    pub directory: String,
    pub file_name: String,
}

impl LogLocation {
    pub fn from_path(path: &str) -> CollectorResult<Self> {
        let path = path.trim();
        match path.rsplit_once('/') {
            Some((directory, file_name)) if !file_name.is_empty() => Ok(Self {
                directory: if directory.is_empty() {
                    "/".to_string()
                } else {
                    directory.to_string()
                },
                file_name: file_name.to_string(),
            }),
            _ => Err(CollectorError::Collection(format!(
                "cannot locate log directory for '{}'",
                path
            ))),
        }
    }

    /// Anchored pattern matching the current log and its rotated siblings.
    pub fn archive_pattern(&self) -> String {
        format!("^{}.*", regex::escape(&self.file_name))
    }

    pub fn directory_path(&self) -> PathBuf {
        PathBuf::from(&self.directory)
    }
}

/// Archive the log files found in `source_dir` into the node directory.
pub fn archive_logs(
    source_dir: &Path,
    location: &LogLocation,
    node_dir: &Path,
) -> CollectorResult<StepStatus> {
    let target = node_dir.join(LOG_ARCHIVE_NAME);
    let stats = archive_to_file(source_dir, &location.archive_pattern(), &target)?;
    Ok(StepStatus::Completed {
        output: target,
        files: stats.files,
    })
}

/// Copy a remote node's log files, and only those, into `staging`.
pub fn stage_remote_logs(
    node: &ClusterNode,
    remote: &RemoteCredentials,
    location: &LogLocation,
    staging: &Path,
    transfer: &dyn TransferProvider,
) -> CollectorResult<()> {
    info!(
        "Copying {}* from {}:{}",
        location.file_name, node.hostname, location.directory
    );
    let source = CopySource::remote(
        node.hostname.clone(),
        Some(remote.username.clone()),
        location.directory.clone(),
    )
    .directory_contents();
    let job = CopyJob::new(source, CopyDestination::new(staging));
    PatternCopyJob::new(job, location.file_name.clone()).start(transfer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::{MockTransferProvider, TransferInvocation, TransferOutput};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_location_from_path() {
        let location = LogLocation::from_path("/var/log/mongodb/mongod.log").unwrap();
        assert_eq!(location.directory, "/var/log/mongodb");
        assert_eq!(location.file_name, "mongod.log");
        assert_eq!(location.archive_pattern(), r"^mongod\.log.*");

        let root = LogLocation::from_path("/mongod.log").unwrap();
        assert_eq!(root.directory, "/");

        assert!(LogLocation::from_path("mongod.log").is_err());
        assert!(LogLocation::from_path("/var/log/").is_err());
    }

    #[test]
    fn test_archive_logs_includes_rotated_files() {
        let source = TempDir::new().unwrap();
        let node_dir = TempDir::new().unwrap();
        fs::write(source.path().join("mongod.log"), b"a").unwrap();
        fs::write(source.path().join("mongod.log.2024-01-01T00-00-00"), b"b").unwrap();
        fs::write(source.path().join("mongodXlog"), b"c").unwrap();
        fs::write(source.path().join("audit.log"), b"d").unwrap();

        let location = LogLocation::from_path("/ignored/mongod.log").unwrap();
        let status = archive_logs(source.path(), &location, node_dir.path()).unwrap();
        match status {
            StepStatus::Completed { files, output } => {
                assert_eq!(files, 2);
                assert_eq!(output, node_dir.path().join("logarchive.tar.gz"));
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_stage_remote_logs_uses_pattern_job() {
        let mut transfer = MockTransferProvider::new();
        transfer
            .expect_run()
            .withf(|invocation| match invocation {
                TransferInvocation::Shell { shell, script } => {
                    shell == "bash"
                        && script.contains("--include='mongod.log*'")
                        && script.contains("'ubuntu@db3:/var/log/mongodb/'")
                }
                _ => false,
            })
            .times(1)
            .returning(|_| {
                Ok(TransferOutput {
                    success: true,
                    ..Default::default()
                })
            });

        stage_remote_logs(
            &ClusterNode::new("db3", 27017),
            &RemoteCredentials {
                username: "ubuntu".to_string(),
            },
            &LogLocation::from_path("/var/log/mongodb/mongod.log").unwrap(),
            Path::new("/tmp/stage"),
            &transfer,
        )
        .unwrap();
    }
}
