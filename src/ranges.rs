//! CIDR range parsing and membership tests.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use crate::error::Error;

/// Parse operator-supplied CIDR strings into networks.
///
/// A bare address is accepted as a /32. Anything else that fails to parse is
/// a hard configuration error: an unparseable entry silently dropped would
/// change which addresses the list effectively covers.
pub(crate) fn parse_ranges(entries: &[String]) -> Result<Vec<Ipv4Net>, Error> {
    entries
        .iter()
        .map(|entry| {
            if let Ok(net) = entry.parse::<Ipv4Net>() {
                return Ok(net);
            }
            if let Ok(addr) = entry.parse::<Ipv4Addr>() {
                return Ok(Ipv4Net::from(addr));
            }
            Err(Error::invalid_cidr(
                entry,
                "expected IPv4 CIDR notation, e.g. 10.0.0.0/8",
            ))
        })
        .collect()
}

/// Whether `ip` falls within at least one of `nets`.
pub(crate) fn contains(nets: &[Ipv4Net], ip: Ipv4Addr) -> bool {
    nets.iter().any(|net| net.contains(&ip))
}
