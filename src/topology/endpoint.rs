use crate::error::{CollectorError, CollectorResult};
use crate::models::ClusterNode;

/// Parse a `host:port` endpoint string.
///
/// Exactly one colon is accepted, the host must be non-empty and the port must
/// be a number in `0..=65535`. Anything else is a configuration error: a
/// topology built from half-parsed endpoints cannot be trusted.
pub fn parse_endpoint(endpoint: &str) -> CollectorResult<ClusterNode> {
    let parts: Vec<&str> = endpoint.split(':').collect();
    if parts.len() != 2 {
        return Err(CollectorError::Configuration(format!(
            "invalid endpoint '{}': expected host:port",
            endpoint
        )));
    }

    let hostname = parts[0].trim();
    if hostname.is_empty() {
        return Err(CollectorError::Configuration(format!(
            "invalid endpoint '{}': empty hostname",
            endpoint
        )));
    }

    let port = parse_port(parts[1]).map_err(|_| {
        CollectorError::Configuration(format!(
            "invalid port in endpoint '{}': {}",
            endpoint, parts[1]
        ))
    })?;

    Ok(ClusterNode::new(hostname, port))
}

/// Parse a listen port, rejecting anything that does not fit in 16 bits.
pub fn parse_port(port: &str) -> CollectorResult<u16> {
    port.trim()
        .parse::<u16>()
        .map_err(|e| CollectorError::Configuration(format!("invalid port number '{}': {}", port, e)))
}

/// True when `endpoint` has the `host:port` shape (one colon, both sides
/// non-empty). The port is not validated here.
pub fn has_endpoint_shape(endpoint: &str) -> bool {
    let mut parts = endpoint.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(host), Some(port), None) => !host.is_empty() && !port.is_empty(),
        _ => false,
    }
}
