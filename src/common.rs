//! Address parsing and resolution shared across the server and admin
//! interfaces.

use crate::error::{Error, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Splits an address string into host and port.
///
/// Accepted forms: `host:port`, `[v6]:port`, and the `:port` shorthand,
/// which binds all interfaces.
pub fn split_host_port(addr: &str) -> Result<(String, u16)> {
    let addr = addr.trim();

    if let Some(port_part) = addr.strip_prefix(':') {
        let port: u16 = port_part
            .parse()
            .map_err(|_| Error::Config(format!("invalid port in address '{}'", addr)))?;
        return Ok(("0.0.0.0".to_string(), port));
    }

    let colon_pos = addr
        .rfind(':')
        .ok_or_else(|| Error::Config(format!("address must include port: '{}'", addr)))?;

    let host_part = &addr[..colon_pos];
    let port_part = &addr[colon_pos + 1..];

    // Handle IPv6 addresses in brackets
    let host = if host_part.starts_with('[') && host_part.ends_with(']') {
        &host_part[1..host_part.len() - 1]
    } else {
        host_part
    };

    let port: u16 = port_part
        .parse()
        .map_err(|_| Error::Config(format!("invalid port in address '{}'", addr)))?;

    Ok((host.to_string(), port))
}

/// Resolves a listen address string into a `SocketAddr`.
pub async fn resolve_listen_addr(listen: &str, resolver: &DnsResolver) -> Result<SocketAddr> {
    let (host, port) = split_host_port(listen)?;
    resolver.resolve(&host, port).await
}

/// Shared DNS resolver wrapper, lazily initialized and reused.
pub struct DnsResolver {
    resolver: Arc<
        Mutex<
            Option<
                hickory_resolver::Resolver<
                    hickory_resolver::name_server::TokioConnectionProvider,
                >,
            >,
        >,
    >,
}

impl DnsResolver {
    /// Creates a new DNS resolver.
    pub fn new() -> Self {
        Self {
            resolver: Arc::new(Mutex::new(None)),
        }
    }

    /// Resolves a hostname to a `SocketAddr`, with a fast path for IP
    /// literals that never touches the resolver.
    pub async fn resolve(&self, host: &str, port: u16) -> Result<SocketAddr> {
        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, port));
        }

        let mut resolver_guard = self.resolver.lock().await;
        if resolver_guard.is_none() {
            let resolver = hickory_resolver::Resolver::builder_tokio()
                .map_err(|e| Error::Config(format!("failed to create DNS resolver: {}", e)))?
                .build();
            *resolver_guard = Some(resolver);
        }

        let resolver = resolver_guard.as_ref().unwrap();

        let response = resolver
            .lookup_ip(host)
            .await
            .map_err(|e| Error::Config(format!("failed to resolve '{}': {}", host, e)))?;

        response
            .iter()
            .next()
            .map(|ip| SocketAddr::new(ip, port))
            .ok_or_else(|| Error::Config(format!("no addresses found for '{}'", host)))
    }
}

impl Default for DnsResolver {
    fn default() -> Self {
        Self::new()
    }
}
