//! The built-in reserved/private IPv4 range set.

use std::sync::OnceLock;

use ipnet::Ipv4Net;

/// IPv4 address space that never belongs to a legitimate outbound fetch
/// target: private networks (RFC 1918), loopback, link-local, carrier-grade
/// NAT (RFC 6598), documentation and benchmarking blocks, multicast, and
/// reserved space (RFC 5735 and friends).
pub const RESERVED_RANGES: [&str; 15] = [
    "0.0.0.0/8",
    "10.0.0.0/8",
    "100.64.0.0/10",
    "127.0.0.0/8",
    "169.254.0.0/16",
    "172.16.0.0/12",
    "192.0.0.0/24",
    "192.0.2.0/24",
    "192.88.99.0/24",
    "192.168.0.0/16",
    "198.18.0.0/15",
    "198.51.100.0/24",
    "203.0.113.0/24",
    "224.0.0.0/4",
    "240.0.0.0/4",
];

/// The reserved set parsed into networks. Parsed once, read-only afterward,
/// safe for unsynchronized concurrent reads.
pub(crate) fn reserved_nets() -> &'static [Ipv4Net] {
    static NETS: OnceLock<Vec<Ipv4Net>> = OnceLock::new();
    NETS.get_or_init(|| {
        RESERVED_RANGES
            .iter()
            .map(|range| range.parse().expect("reserved range table is well-formed"))
            .collect()
    })
}
