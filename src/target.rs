use crate::types::TargetDescriptor;
use crate::{Result, ScanError};
use log::debug;
use std::net::IpAddr;
use tokio::net::lookup_host;
use url::{Host, Url};

/// Parse a raw target string into a descriptor.
///
/// Anything not starting with `http` is rejected with `MissingScheme`, which the
/// dispatcher treats as a per-target skip. A string that starts with `http` but
/// still has no usable scheme or host is `MalformedTarget`.
pub fn parse(raw: &str) -> Result<TargetDescriptor> {
    let raw = raw.trim();
    if !raw.starts_with("http") {
        return Err(ScanError::MissingScheme(raw.to_string()));
    }

    let parsed =
        Url::parse(raw).map_err(|e| ScanError::MalformedTarget(format!("{}: {}", raw, e)))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ScanError::MalformedTarget(format!("{}: unsupported scheme {}", raw, scheme)));
    }

    let hostname = match parsed.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        _ => return Err(ScanError::MalformedTarget(format!("{}: no hostname", raw))),
    };

    // host_str keeps the brackets around IPv6 literals, which is what tools expect
    let host = parsed.host_str().unwrap_or(&hostname);
    let port = parsed.port();
    let netloc = match port {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let path = match parsed.path() {
        "" | "/" => None,
        path => Some(path.to_string()),
    };

    let descriptor = TargetDescriptor {
        scheme: scheme.to_string(),
        hostname,
        port,
        netloc,
        path,
    };
    debug!("Parsed target {:?}", descriptor);
    Ok(descriptor)
}

/// Make sure the hostname resolves before anything is run against it.
/// Literal IP addresses always pass.
pub async fn resolve(hostname: &str) -> Result<()> {
    if hostname.parse::<IpAddr>().is_ok() {
        return Ok(());
    }

    match lookup_host((hostname, 80)).await {
        Ok(mut addrs) => match addrs.next() {
            Some(addr) => {
                debug!("{} resolved to {}", hostname, addr.ip());
                Ok(())
            }
            None => Err(ScanError::UnresolvableHost(hostname.to_string())),
        },
        Err(e) => {
            debug!("Failed to resolve {}: {}", hostname, e);
            Err(ScanError::UnresolvableHost(hostname.to_string()))
        }
    }
}
