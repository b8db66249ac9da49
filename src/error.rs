//! Error types for urlwarden.
//!
//! Only structurally invalid operator input is an error. A URL that is
//! merely unsafe is not an error at all: it produces a
//! [`Decision::Denied`](crate::Decision) value through the normal return
//! path.

use thiserror::Error;

/// Configuration errors raised while resolving options.
///
/// These are fatal and surfaced immediately: a malformed CIDR entry must not
/// silently widen the effective allowlist or blocklist, and a missing
/// required option means nobody decided the policy.
#[derive(Debug, Error)]
pub enum Error {
    /// A blocklist or allowlist entry could not be parsed as an IPv4 CIDR
    /// range.
    #[error("invalid CIDR range '{entry}': {reason}")]
    InvalidCidr { entry: String, reason: String },

    /// A required option was supplied neither by the caller nor by the
    /// defaults.
    #[error("option '{key}' has no override and no default")]
    MissingOption { key: &'static str },
}

impl Error {
    pub(crate) fn invalid_cidr(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCidr {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing_option(key: &'static str) -> Self {
        Self::MissingOption { key }
    }
}
