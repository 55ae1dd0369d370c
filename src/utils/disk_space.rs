use std::path::{Path, PathBuf};

use log::debug;
use sysinfo::{DiskExt, System, SystemExt};

use crate::error::{CollectorError, CollectorResult};

/// Free space of the filesystem holding a path.
#[cfg_attr(test, mockall::automock)]
pub trait DiskSpace {
    fn available_bytes(&self, path: &Path) -> CollectorResult<u64>;
}

/// Free space as reported by `sysinfo` for the disk with the longest mount
/// point that prefixes the path.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoDiskSpace;

impl DiskSpace for SysinfoDiskSpace {
    fn available_bytes(&self, path: &Path) -> CollectorResult<u64> {
        let target = path.canonicalize()?;

        let mut system = System::new();
        system.refresh_disks_list();

        let mounts: Vec<(PathBuf, u64)> = system
            .disks()
            .iter()
            .map(|disk| (disk.mount_point().to_path_buf(), disk.available_space()))
            .collect();

        let available = available_on_longest_mount(&target, &mounts).ok_or_else(|| {
            CollectorError::Precondition(format!(
                "no mounted filesystem found for {}",
                target.display()
            ))
        })?;
        debug!("{} bytes available for {}", available, target.display());
        Ok(available)
    }
}

fn available_on_longest_mount(target: &Path, mounts: &[(PathBuf, u64)]) -> Option<u64> {
    mounts
        .iter()
        .filter(|(mount, _)| target.starts_with(mount))
        .max_by_key(|(mount, _)| mount.components().count())
        .map(|(_, available)| *available)
}

/// Fail with a precondition error when less than `min_bytes` are free at `path`.
pub fn ensure_free_space(disk: &dyn DiskSpace, path: &Path, min_bytes: u64) -> CollectorResult<()> {
    let available = disk.available_bytes(path)?;
    if available < min_bytes {
        return Err(CollectorError::Precondition(format!(
            "only {} bytes free at {}, at least {} required",
            available,
            path.display(),
            min_bytes
        )));
    }
    Ok(())
}
