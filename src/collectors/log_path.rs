//! Reconstruct an absolute log path from the configured `systemLog.path`.
//!
//! A path such as `./db/mongod.log` is relative to the server's working
//! directory, which the server does not report. The diagnostic data
//! directory is absolute and usually lives under the same tree, so it is
//! used as an anchor: the first segment of the relative path is looked up in
//! the diagnostic directory's segments and everything above it becomes the
//! parent.

use log::{debug, warn};

const SAME_DIR_PREFIX: &str = "./";
const SAME_DIR_SEGMENT: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPathEstimate {
    pub raw_configured_path: String,
    pub diagnostic_dir_path: String,
    pub resolved_path: String,
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|s| !s.is_empty() && *s != SAME_DIR_SEGMENT)
        .collect()
}

/// Best guess of the absolute location of `raw_path`.
///
/// Paths that do not start with `./` are returned unchanged, as is any path
/// when `diagnostic_dir` is empty. When the anchor segment does not occur in
/// `diagnostic_dir`, the diagnostic directory's parent is used.
pub fn estimate_log_path(raw_path: &str, diagnostic_dir: &str) -> LogPathEstimate {
    let resolved_path = match raw_path.strip_prefix(SAME_DIR_PREFIX) {
        Some(relative) if !diagnostic_dir.trim().is_empty() => {
            resolve_relative(relative, diagnostic_dir).unwrap_or_else(|| raw_path.to_string())
        }
        _ => raw_path.to_string(),
    };

    if resolved_path != raw_path {
        debug!("Estimated log path {} from {}", resolved_path, raw_path);
    }

    LogPathEstimate {
        raw_configured_path: raw_path.to_string(),
        diagnostic_dir_path: diagnostic_dir.to_string(),
        resolved_path,
    }
}

fn resolve_relative(relative: &str, diagnostic_dir: &str) -> Option<String> {
    let relative = segments(relative);
    let anchor = *relative.first()?;
    let dir = segments(diagnostic_dir.trim());

    let parent = match dir.iter().position(|segment| *segment == anchor) {
        Some(idx) => &dir[..idx],
        None => {
            warn!(
                "'{}' not found in diagnostic directory {}, assuming the log is under its parent",
                anchor, diagnostic_dir
            );
            &dir[..dir.len().saturating_sub(1)]
        }
    };

    let mut path = String::new();
    for segment in parent.iter().chain(relative.iter()) {
        path.push('/');
        path.push_str(segment);
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn resolved(raw: &str, dir: &str) -> String {
        estimate_log_path(raw, dir).resolved_path
    }

    #[test]
    fn test_anchor_missing_uses_diagnostic_parent() {
        assert_eq!(
            resolved("./mongod.log", "/data/db/diagnostic.data/"),
            "/data/db/mongod.log"
        );
    }

    #[test]
    fn test_walk_stops_at_anchor() {
        assert_eq!(
            resolved("./db/mongod.log", "/data/db/diagnostic.data/"),
            "/data/db/mongod.log"
        );
        assert_eq!(
            resolved("./data/logs/mongod.log", "/data/db/diagnostic.data"),
            "/data/logs/mongod.log"
        );
    }

    #[test]
    fn test_same_dir_segments_skipped() {
        assert_eq!(
            resolved("./db/./mongod.log", "/./data//db/diagnostic.data"),
            "/data/db/mongod.log"
        );
    }

    #[test]
    fn test_absolute_path_unchanged() {
        assert_eq!(
            resolved("/var/log/mongod.log", "/data/db/diagnostic.data/"),
            "/var/log/mongod.log"
        );
    }

    #[test]
    fn test_empty_diagnostic_dir_keeps_raw() {
        let estimate = estimate_log_path("./mongod.log", "");
        assert_eq!(estimate.resolved_path, "./mongod.log");
        assert_eq!(estimate.raw_configured_path, "./mongod.log");
    }

    #[test]
    fn test_bare_prefix_keeps_raw() {
        assert_eq!(resolved("./", "/data/db/diagnostic.data"), "./");
    }

    proptest! {
        #[test]
        fn prop_non_relative_is_unchanged(raw in "/[a-z/]{0,40}", dir in "[a-z/.]{0,40}") {
            prop_assert_eq!(resolved(&raw, &dir), raw);
        }

        #[test]
        fn prop_found_anchor_gives_dir_prefix(
            prefix in prop::collection::vec("[a-m]{1,8}", 0..4),
            anchor in "[n-z]{1,8}",
            file in "[a-z]{1,8}\\.log",
        ) {
            let dir = format!("/{}/{}/diagnostic.data", prefix.join("/"), anchor);
            let raw = format!("./{}/{}", anchor, file);
            let mut expected = String::new();
            for segment in prefix.iter() {
                expected.push('/');
                expected.push_str(segment);
            }
            expected.push_str(&format!("/{}/{}", anchor, file));
            prop_assert_eq!(resolved(&raw, &dir), expected);
        }
    }
}
