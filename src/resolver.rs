//! Pluggable hostname resolution.
//!
//! DNS is the one seam of this crate that touches the outside world, so it
//! is behind the [`Resolve`] trait. The built-in [`SystemResolver`] performs
//! live lookups; [`StaticResolver`] serves a fixed map, which is what tests
//! and hermetic deployments want. Any other implementation composes the same
//! way as long as a successful resolution returns at least one address.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};

use hickory_resolver::TokioResolver;
use thiserror::Error;

/// A failed hostname resolution.
///
/// Validation never surfaces this to its caller: any resolution failure
/// collapses into a denial, because an unresolvable host and an unsafe host
/// are indistinguishable for SSRF-defense purposes.
#[derive(Debug, Error)]
#[error("resolution failed for {host}: {message}")]
pub struct ResolveError {
    pub host: String,
    pub message: String,
}

impl ResolveError {
    /// Create a resolution error for `host`.
    pub fn new(host: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            message: message.into(),
        }
    }
}

/// Maps a hostname to one or more IPv4 addresses.
///
/// Implementations must return a non-empty sequence on success; an empty
/// success is treated by the validator exactly like a failure.
pub trait Resolve {
    /// Resolve `host` to its IPv4 addresses.
    fn resolve(&self, host: &str) -> Result<Vec<Ipv4Addr>, ResolveError>;
}

/// The default resolver: system/library DNS via hickory.
///
/// Resolution blocks the calling thread. The lookup itself is async, so the
/// call either piggybacks on an ambient Tokio runtime or spins up a
/// temporary one. Timeout and retry behavior is whatever the underlying
/// resolver configuration says; the validator imposes none of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl SystemResolver {
    pub fn new() -> Self {
        Self
    }

    async fn lookup(host: &str) -> Result<Vec<Ipv4Addr>, ResolveError> {
        let resolver = TokioResolver::builder_tokio()
            .map_err(|e| ResolveError::new(host, e.to_string()))?
            .build();

        let response = resolver
            .lookup_ip(host)
            .await
            .map_err(|e| ResolveError::new(host, e.to_string()))?;

        Ok(response
            .iter()
            .filter_map(|ip| match ip {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            })
            .collect())
    }
}

impl Resolve for SystemResolver {
    fn resolve(&self, host: &str) -> Result<Vec<Ipv4Addr>, ResolveError> {
        // Works both inside and outside a Tokio runtime. When called from
        // within one, block_in_place keeps the worker thread usable.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(Self::lookup(host)))
        } else {
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| ResolveError::new(host, e.to_string()))?;
            rt.block_on(Self::lookup(host))
        }
    }
}

/// A resolver backed by a fixed host-to-addresses map.
///
/// Hosts absent from the map fail to resolve, which the validator turns
/// into a denial.
///
/// # Example
///
/// ```rust
/// use std::net::Ipv4Addr;
/// use urlwarden::StaticResolver;
///
/// let resolver = StaticResolver::new()
///     .entry("api.example.com", [Ipv4Addr::new(203, 0, 113, 10)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    entries: HashMap<String, Vec<Ipv4Addr>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping from `host` to `addrs`. Hostname matching is
    /// case-insensitive.
    pub fn entry(mut self, host: &str, addrs: impl IntoIterator<Item = Ipv4Addr>) -> Self {
        self.entries
            .insert(host.to_lowercase(), addrs.into_iter().collect());
        self
    }
}

impl Resolve for StaticResolver {
    fn resolve(&self, host: &str) -> Result<Vec<Ipv4Addr>, ResolveError> {
        self.entries
            .get(&host.to_lowercase())
            .cloned()
            .ok_or_else(|| ResolveError::new(host, "no static mapping"))
    }
}
