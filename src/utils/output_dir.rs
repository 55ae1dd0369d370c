use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info, warn};

use crate::constants::TEMP_DIR_NAME;
use crate::error::{CollectorError, CollectorResult};
use crate::models::ClusterNode;

/// Directory layout of one collection run.
///
/// ```text
/// <root>/<cluster>[_<unix-secs>]/<host>_<port>/   per-node outputs
/// <root>/temp/<cluster>/<host>_<port>/<kind>/     staging for remote copies
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    cluster_name: String,
    run_dir: PathBuf,
}

impl OutputLayout {
    /// Create the run directory. An existing `<root>/<cluster>` is left
    /// alone and a timestamp suffixed directory is used instead.
    pub fn create(root: impl Into<PathBuf>, cluster_name: &str) -> CollectorResult<Self> {
        let root = root.into();
        let mut run_dir = root.join(cluster_name);
        if run_dir.exists() {
            let suffixed = root.join(format!("{}_{}", cluster_name, Utc::now().timestamp()));
            warn!(
                "Output directory {} already exists, using {}",
                run_dir.display(),
                suffixed.display()
            );
            run_dir = suffixed;
        }

        fs::create_dir_all(&run_dir).map_err(|e| {
            CollectorError::Precondition(format!(
                "cannot create output directory {}: {}",
                run_dir.display(),
                e
            ))
        })?;
        info!("Writing outputs to {}", run_dir.display());

        Ok(Self {
            root,
            cluster_name: cluster_name.to_string(),
            run_dir,
        })
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    /// Create and return the node's output directory.
    pub fn node_dir(&self, node: &ClusterNode) -> CollectorResult<PathBuf> {
        let dir = self.run_dir.join(node.dir_name());
        fs::create_dir_all(&dir).map_err(|e| {
            CollectorError::Precondition(format!(
                "cannot create node directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(dir)
    }

    fn node_staging_root(&self, node: &ClusterNode) -> PathBuf {
        self.root
            .join(TEMP_DIR_NAME)
            .join(&self.cluster_name)
            .join(node.dir_name())
    }

    /// Empty staging directory for one kind of file copied from `node`.
    pub fn staging_dir(&self, node: &ClusterNode, kind: &str) -> CollectorResult<PathBuf> {
        let dir = self.node_staging_root(node).join(kind);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir).map_err(|e| {
            CollectorError::Collection(format!(
                "cannot create staging directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(dir)
    }

    /// Remove everything staged for `node`.
    pub fn remove_staging(&self, node: &ClusterNode) {
        let dir = self.node_staging_root(node);
        if dir.exists() {
            match fs::remove_dir_all(&dir) {
                Ok(()) => debug!("Removed staging directory {}", dir.display()),
                Err(e) => warn!("Could not remove staging directory {}: {}", dir.display(), e),
            }
        }
    }
}
