//! Validation outcomes.

use std::fmt;

/// The outcome of validating one URL.
///
/// A denial is an expected result, not an error: the compiler forces every
/// caller to handle both arms instead of checking a boolean and reading a
/// reason out of a side channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The URL may be fetched.
    Allowed,

    /// The URL must not be fetched.
    Denied(DenyReason),
}

impl Decision {
    /// Whether the URL may be fetched.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    /// Stable machine-readable code for this outcome.
    ///
    /// `"ok"` for an allowed URL, otherwise the denial reason's code.
    pub fn code(&self) -> &'static str {
        match self {
            Decision::Allowed => "ok",
            Decision::Denied(reason) => reason.code(),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Why a URL was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The URL's scheme is not in the configured scheme list.
    UnsafeScheme,

    /// The resolved address falls in the built-in reserved/private range
    /// set.
    UnsafeReserved,

    /// The resolved address falls in the caller-supplied blocklist.
    UnsafeBlocklist,

    /// An allowlist is configured and the resolved address is outside it.
    UnsafeAllowlist,

    /// The host resolved to no usable address. Unresolvable hosts are
    /// denied, never allowed by default.
    UnresolvableHost,

    /// Generic denial reported when `detailed_error` is off. The specific
    /// reason is computed internally and then collapsed to this one.
    Restricted,
}

impl DenyReason {
    /// Stable machine-readable code for this reason.
    pub fn code(&self) -> &'static str {
        match self {
            DenyReason::UnsafeScheme => "unsafe_scheme",
            DenyReason::UnsafeReserved => "unsafe_reserved",
            DenyReason::UnsafeBlocklist => "unsafe_blocklist",
            DenyReason::UnsafeAllowlist => "unsafe_allowlist",
            DenyReason::UnresolvableHost => "unresolvable_host",
            DenyReason::Restricted => "restricted",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
