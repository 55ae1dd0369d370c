use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::constants::{DEFAULT_SEED_HOST, DEFAULT_SEED_PORT, MAX_INPUT_SIZE};
use crate::error::{CollectorError, CollectorResult};
use crate::models::ClusterNode;
use crate::topology::endpoint::parse_port;

lazy_static! {
    static ref URI_OPTIONS_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9\-\.]+=[a-zA-Z0-9\-\.]+(&[a-zA-Z0-9\-\.]+=[a-zA-Z0-9\-\.]+)*$")
            .expect("static regex");
}

/// Database connection settings gathered from the operator.
///
/// The password is never serialized; the struct is written into the run
/// summary with the secret skipped.
#[derive(Debug, Clone, Serialize)]
pub struct MongoCredentials {
    pub cluster_name: String,
    pub seed_host: String,
    pub seed_port: u16,
    pub username: Option<String>,
    #[serde(skip)]
    pub password: Option<String>,
    pub uri_options: Option<String>,
}

impl Default for MongoCredentials {
    fn default() -> Self {
        Self {
            cluster_name: String::new(),
            seed_host: DEFAULT_SEED_HOST.to_string(),
            seed_port: DEFAULT_SEED_PORT,
            username: None,
            password: None,
            uri_options: None,
        }
    }
}

impl MongoCredentials {
    pub fn seed_node(&self) -> ClusterNode {
        ClusterNode::new(self.seed_host.clone(), self.seed_port)
    }

    /// Direct connection URI for one node of the cluster.
    pub fn connection_uri(&self, node: &ClusterNode) -> String {
        let mut uri = format!(
            "mongodb://{}:{}/admin?directConnection=true",
            node.hostname, node.port
        );
        if let Some(options) = self.uri_options.as_deref().filter(|o| !o.is_empty()) {
            uri.push('&');
            uri.push_str(options);
        }
        uri
    }

    pub fn has_auth(&self) -> bool {
        self.username.as_deref().map_or(false, |u| !u.is_empty())
    }
}

/// Passwordless SSH account used to pull files from remote nodes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RemoteCredentials {
    pub username: String,
}

/// Reject oversized operator input before it is used anywhere.
pub fn check_input_size(input: &str) -> CollectorResult<()> {
    if input.len() > MAX_INPUT_SIZE {
        return Err(CollectorError::Configuration(
            "input too large beyond 16mb".to_string(),
        ));
    }
    Ok(())
}

/// Validate a seed port string. Blank input falls back to the default port.
pub fn validate_seed_port(input: &str) -> CollectorResult<u16> {
    check_input_size(input)?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_SEED_PORT);
    }
    parse_port(trimmed)
}

/// Validate URI options given as `name1=value1&name2=value2`.
///
/// `replicaSet` is refused because every node is contacted with a direct
/// connection.
pub fn validate_uri_options(options: &str) -> CollectorResult<()> {
    check_input_size(options)?;
    if !URI_OPTIONS_RE.is_match(options) {
        return Err(CollectorError::Configuration(
            "connection uri options should be in format name1=value1&name2=value2".to_string(),
        ));
    }
    if options.contains("replicaSet") {
        return Err(CollectorError::Configuration(
            "do not enter replicaSet in options".to_string(),
        ));
    }
    Ok(())
}

/// Lowercase name used when the operator does not name the cluster.
pub fn generate_cluster_name(len: usize) -> String {
    uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                (b'a' + (c as u8 - b'0')) as char
            } else {
                c
            }
        })
        .take(len)
        .collect()
}
