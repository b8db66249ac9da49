//! Option resolution: caller overrides merged over process-wide defaults.
//!
//! The merge is per key and all-or-nothing: an explicitly supplied value is
//! used verbatim, including an explicitly empty list. There is no element-
//! wise merging of caller lists with default lists. The only computed
//! combination is `blocklist` plus the reserved set, and that happens in the
//! evaluator, not here.

use std::fmt;
use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use crate::error::Error;
use crate::ranges;
use crate::resolver::{Resolve, SystemResolver};

/// Caller-supplied overrides for a single validation call.
///
/// Every field is optional; whatever is left unset falls back to the
/// [`Defaults`] passed alongside. The builder consumes `self` on each call.
///
/// # Example
///
/// ```rust
/// use urlwarden::ValidateOptions;
///
/// let options = ValidateOptions::new()
///     .schemes(["https"])
///     .blocklist(["203.0.113.0/24"])
///     .detailed_error(false);
/// ```
#[derive(Default)]
pub struct ValidateOptions<'r> {
    schemes: Option<Vec<String>>,
    block_reserved: Option<bool>,
    blocklist: Option<Vec<String>>,
    allowlist: Option<Vec<String>>,
    detailed_error: Option<bool>,
    resolver: Option<&'r dyn Resolve>,
}

impl<'r> ValidateOptions<'r> {
    /// No overrides; every key falls back to the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted URL schemes. An empty list accepts no scheme at all.
    pub fn schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemes = Some(schemes.into_iter().map(Into::into).collect());
        self
    }

    /// Whether the built-in reserved/private range set is appended to the
    /// blocklist.
    pub fn block_reserved(mut self, block: bool) -> Self {
        self.block_reserved = Some(block);
        self
    }

    /// CIDR ranges to deny, in addition to the reserved set when
    /// `block_reserved` is on.
    pub fn blocklist<I, S>(mut self, ranges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocklist = Some(ranges.into_iter().map(Into::into).collect());
        self
    }

    /// CIDR ranges to permit. A non-empty allowlist entirely supersedes
    /// blocklist logic for the call.
    pub fn allowlist<I, S>(mut self, ranges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowlist = Some(ranges.into_iter().map(Into::into).collect());
        self
    }

    /// Whether denials carry their specific reason or collapse to the
    /// generic `restricted` code.
    pub fn detailed_error(mut self, detailed: bool) -> Self {
        self.detailed_error = Some(detailed);
        self
    }

    /// Resolver to use for this call. Borrowed, never retained past the
    /// call.
    pub fn resolver(mut self, resolver: &'r dyn Resolve) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Merge these overrides over `defaults` into a fully populated
    /// [`Config`], parsing CIDR lists as we go.
    ///
    /// # Errors
    ///
    /// [`Error::MissingOption`] if a key has neither an override nor a
    /// default, [`Error::InvalidCidr`] if a list entry does not parse.
    pub fn resolve<'c>(&'c self, defaults: &'c Defaults) -> Result<Config<'c>, Error> {
        let schemes = match &self.schemes {
            Some(schemes) => schemes.clone(),
            None => defaults
                .schemes
                .clone()
                .ok_or_else(|| Error::missing_option("schemes"))?,
        };

        let block_reserved = self
            .block_reserved
            .or(defaults.block_reserved)
            .ok_or_else(|| Error::missing_option("block_reserved"))?;

        let blocklist = match &self.blocklist {
            Some(entries) => ranges::parse_ranges(entries)?,
            None => match &defaults.blocklist {
                Some(entries) => ranges::parse_ranges(entries)?,
                None => return Err(Error::missing_option("blocklist")),
            },
        };

        let allowlist = match &self.allowlist {
            Some(entries) => ranges::parse_ranges(entries)?,
            None => match &defaults.allowlist {
                Some(entries) => ranges::parse_ranges(entries)?,
                None => return Err(Error::missing_option("allowlist")),
            },
        };

        let detailed_error = self
            .detailed_error
            .or(defaults.detailed_error)
            .ok_or_else(|| Error::missing_option("detailed_error"))?;

        let resolver = self
            .resolver
            .or_else(|| defaults.resolver.as_deref().map(|r| r as &dyn Resolve))
            .ok_or_else(|| Error::missing_option("resolver"))?;

        Ok(Config {
            schemes,
            block_reserved,
            blocklist,
            allowlist,
            detailed_error,
            resolver,
        })
    }
}

impl fmt::Debug for ValidateOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidateOptions")
            .field("schemes", &self.schemes)
            .field("block_reserved", &self.block_reserved)
            .field("blocklist", &self.blocklist)
            .field("allowlist", &self.allowlist)
            .field("detailed_error", &self.detailed_error)
            .field("resolver", &self.resolver.map(|_| "<override>"))
            .finish()
    }
}

/// Process-wide default option values.
///
/// Held by the composition root and passed explicitly into every
/// [`validate`](crate::validate) call; nothing in the core reads ambient or
/// global state. `Defaults::default()` gives the standard posture: http and
/// https only, reserved ranges blocked, empty custom lists, detailed
/// reasons, live DNS.
pub struct Defaults {
    pub schemes: Option<Vec<String>>,
    pub block_reserved: Option<bool>,
    pub blocklist: Option<Vec<String>>,
    pub allowlist: Option<Vec<String>>,
    pub detailed_error: Option<bool>,
    pub resolver: Option<Box<dyn Resolve + Send + Sync>>,
}

impl Defaults {
    /// No defaults at all. Every key must then be supplied per call, or
    /// option resolution fails.
    pub fn empty() -> Self {
        Self {
            schemes: None,
            block_reserved: None,
            blocklist: None,
            allowlist: None,
            detailed_error: None,
            resolver: None,
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            schemes: Some(vec!["http".to_string(), "https".to_string()]),
            block_reserved: Some(true),
            blocklist: Some(Vec::new()),
            allowlist: Some(Vec::new()),
            detailed_error: Some(true),
            resolver: Some(Box::new(SystemResolver::new())),
        }
    }
}

impl fmt::Debug for Defaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Defaults")
            .field("schemes", &self.schemes)
            .field("block_reserved", &self.block_reserved)
            .field("blocklist", &self.blocklist)
            .field("allowlist", &self.allowlist)
            .field("detailed_error", &self.detailed_error)
            .field("resolver", &self.resolver.as_ref().map(|_| "<resolver>"))
            .finish()
    }
}

/// A fully populated configuration for one validation call.
///
/// Owned by the evaluator for the duration of the call; the resolver is
/// borrowed and never retained. CIDR lists are already parsed, so
/// evaluation itself cannot hit a configuration error.
pub struct Config<'r> {
    schemes: Vec<String>,
    block_reserved: bool,
    blocklist: Vec<Ipv4Net>,
    allowlist: Vec<Ipv4Net>,
    detailed_error: bool,
    resolver: &'r dyn Resolve,
}

impl<'r> Config<'r> {
    pub(crate) fn accepts_scheme(&self, scheme: &str) -> bool {
        self.schemes.iter().any(|s| s == scheme)
    }

    pub(crate) fn block_reserved(&self) -> bool {
        self.block_reserved
    }

    pub(crate) fn blocklist(&self) -> &[Ipv4Net] {
        &self.blocklist
    }

    pub(crate) fn allowlist(&self) -> &[Ipv4Net] {
        &self.allowlist
    }

    pub(crate) fn detailed_error(&self) -> bool {
        self.detailed_error
    }

    pub(crate) fn resolver(&self) -> &'r dyn Resolve {
        self.resolver
    }

    pub(crate) fn resolve_host(&self, host: &str) -> Option<Ipv4Addr> {
        if host.is_empty() {
            return None;
        }

        // Literal addresses skip DNS entirely.
        if let Ok(ip) = host.parse::<Ipv4Addr>() {
            return Some(ip);
        }

        // Only the first answer is checked; multi-record round-robin is a
        // documented limitation (see crate docs). Failure and an empty
        // success both collapse to "no address".
        match self.resolver.resolve(host) {
            Ok(addrs) => addrs.first().copied(),
            Err(_) => None,
        }
    }
}

impl fmt::Debug for Config<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("schemes", &self.schemes)
            .field("block_reserved", &self.block_reserved)
            .field("blocklist", &self.blocklist)
            .field("allowlist", &self.allowlist)
            .field("detailed_error", &self.detailed_error)
            .finish_non_exhaustive()
    }
}
