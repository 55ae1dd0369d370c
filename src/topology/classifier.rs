use std::net::Ipv4Addr;

use log::debug;

use crate::error::{CollectorError, CollectorResult};
use crate::topology::interfaces::InterfaceSource;
use crate::topology::resolver::DnsResolver;

/// Decides whether a hostname refers to this machine.
#[cfg_attr(test, mockall::automock)]
pub trait NodeLocality {
    fn is_local(&self, hostname: &str) -> CollectorResult<bool>;
}

/// Compares a host's resolved addresses with the loopback block
/// `127.0.0.1..=127.0.0.255` and this machine's interface addresses.
pub struct LocalityClassifier<D, I> {
    dns: D,
    interfaces: I,
}

impl<D: DnsResolver, I: InterfaceSource> LocalityClassifier<D, I> {
    pub fn new(dns: D, interfaces: I) -> Self {
        Self { dns, interfaces }
    }

    fn local_addresses(&self) -> CollectorResult<Vec<Ipv4Addr>> {
        let mut local: Vec<Ipv4Addr> = (1..=255).map(|last| Ipv4Addr::new(127, 0, 0, last)).collect();
        local.extend(self.interfaces.ipv4_addresses()?);
        Ok(local)
    }
}

impl<D: DnsResolver, I: InterfaceSource> NodeLocality for LocalityClassifier<D, I> {
    fn is_local(&self, hostname: &str) -> CollectorResult<bool> {
        let resolved = self
            .dns
            .lookup_ipv4(hostname)
            .map_err(|e| CollectorError::Resolution {
                host: hostname.to_string(),
                reason: e.to_string(),
            })?;
        let local = self.local_addresses()?;

        let is_local = resolved.iter().any(|ip| local.contains(ip));
        debug!(
            "{} resolves to {:?}: {}",
            hostname,
            resolved,
            if is_local { "local" } else { "remote" }
        );
        Ok(is_local)
    }
}
