use std::net::Ipv4Addr;

use crate::error::{CollectorError, CollectorResult};

/// Source of this machine's IPv4 interface addresses.
#[cfg_attr(test, mockall::automock)]
pub trait InterfaceSource {
    /// Non-loopback IPv4 addresses of every interface.
    fn ipv4_addresses(&self) -> CollectorResult<Vec<Ipv4Addr>>;
}

/// Reads interface addresses from the kernel with `getifaddrs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    #[cfg(unix)]
    fn ipv4_addresses(&self) -> CollectorResult<Vec<Ipv4Addr>> {
        let mut addrs = Vec::new();
        let mut ifap: *mut libc::ifaddrs = std::ptr::null_mut();

        // SAFETY: getifaddrs allocates a linked list that we only read and
        // release with freeifaddrs before returning.
        unsafe {
            if libc::getifaddrs(&mut ifap) != 0 {
                return Err(CollectorError::Classification(format!(
                    "getifaddrs failed: {}",
                    std::io::Error::last_os_error()
                )));
            }

            let mut cursor = ifap;
            while !cursor.is_null() {
                let entry = &*cursor;
                if !entry.ifa_addr.is_null()
                    && i32::from((*entry.ifa_addr).sa_family) == libc::AF_INET
                {
                    let sin = &*(entry.ifa_addr as *const libc::sockaddr_in);
                    let ip = Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr));
                    if !ip.is_loopback() && !addrs.contains(&ip) {
                        addrs.push(ip);
                    }
                }
                cursor = entry.ifa_next;
            }

            libc::freeifaddrs(ifap);
        }

        Ok(addrs)
    }

    #[cfg(not(unix))]
    fn ipv4_addresses(&self) -> CollectorResult<Vec<Ipv4Addr>> {
        Err(CollectorError::Classification(
            "interface enumeration is only supported on unix".to_string(),
        ))
    }
}
