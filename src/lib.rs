//! # urlwarden
//!
//! SSRF-safe URL validation for Rust.
//!
//! `urlwarden` decides whether a URL is safe to fetch before your code
//! initiates an outbound request, preventing Server-Side Request Forgery
//! (SSRF): an attacker-supplied URL that would make your server fetch an
//! internal or otherwise private resource. It does not make HTTP requests
//! itself — it parses the URL, resolves the host through a pluggable
//! resolver, and checks the address against CIDR allow/block policies.
//!
//! ## Quick Start
//!
//! ```rust
//! use urlwarden::{validate, Decision, Defaults, ValidateOptions};
//!
//! # fn example() -> Result<(), urlwarden::Error> {
//! let defaults = Defaults::default();
//! match validate("http://169.254.169.254/", &ValidateOptions::new(), &defaults)? {
//!     Decision::Allowed => { /* hand the URL to your HTTP client */ }
//!     Decision::Denied(reason) => eprintln!("refusing to fetch: {reason}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Policy model
//!
//! Evaluation is a fixed short-circuit sequence:
//!
//! 1. The URL's scheme must be in the configured scheme list, else the URL
//!    is denied with `unsafe_scheme`.
//! 2. The host is resolved to an IPv4 address: a literal address parses
//!    directly, anything else goes through the [`Resolve`] implementation.
//!    A host that yields no address is denied (`unresolvable_host`) — the
//!    validator fails closed.
//! 3. If an allowlist is configured, the address must fall inside it
//!    (`unsafe_allowlist` otherwise). The blocklist and reserved set are
//!    not consulted at all on this branch.
//! 4. Otherwise the address must avoid the caller's blocklist
//!    (`unsafe_blocklist`) and, unless disabled, the built-in reserved
//!    range set (`unsafe_reserved`).
//!
//! Setting `detailed_error(false)` collapses every denial to the generic
//! `restricted` code without changing which URLs are denied.
//!
//! ## Known limitation
//!
//! Only the first address returned by the resolver is checked. If your
//! transport resolves the host again for the actual connection, an
//! attacker-controlled DNS server can answer differently the second time.
//! Pin the connection to the checked address, or use the `fetch` feature's
//! wrapper and accept its constraints.

mod decision;
mod error;
mod options;
mod ranges;
mod reserved;
mod resolver;
mod url_parts;
mod validate;

#[cfg(feature = "fetch")]
mod fetch;

pub use decision::{Decision, DenyReason};
pub use error::Error;
pub use options::{Config, Defaults, ValidateOptions};
pub use reserved::RESERVED_RANGES;
pub use resolver::{Resolve, ResolveError, StaticResolver, SystemResolver};
pub use validate::{evaluate, validate};

#[cfg(feature = "fetch")]
pub use fetch::{fetch, FetchError};
