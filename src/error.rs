//! Error taxonomy for the collector.
//!
//! Each variant maps to one recovery policy. Configuration, probe and
//! precondition failures abort the run; resolution, classification,
//! collection and transfer failures are scoped to a single node and the run
//! continues with the next one.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectorError {
    /// Malformed endpoint strings, invalid ports, bad URI options
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Database shell failure or unparseable reply during topology discovery
    #[error("probe error: {0}")]
    Probe(String),

    /// DNS lookup failure for a single hostname
    #[error("resolution error for {host}: {reason}")]
    Resolution { host: String, reason: String },

    /// Local interface enumeration failure
    #[error("classification error: {0}")]
    Classification(String),

    /// Diagnostic command or archiving failure for a node
    #[error("collection error: {0}")]
    Collection(String),

    /// Copy job aborted (launch failure, stream error, non-zero exit, kill)
    #[error("transfer error: {0}")]
    Transfer(String),

    /// Free space or output directory preconditions not met
    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CollectorResult<T> = std::result::Result<T, CollectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_convert() {
        let err: CollectorError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, CollectorError::Io(_)));
    }

    #[test]
    fn test_display_includes_host() {
        let err = CollectorError::Resolution {
            host: "db1.example.net".into(),
            reason: "no such host".into(),
        };
        assert_eq!(
            err.to_string(),
            "resolution error for db1.example.net: no such host"
        );
    }
}
