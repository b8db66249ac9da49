//! Thin HTTP-client glue: validate, then GET.
//!
//! This wrapper forwards the original URL unchanged to the transport once
//! validation allows it, and short-circuits without any network call when
//! validation denies it. Redirects are disabled because redirect targets
//! are not re-validated; a redirect response is returned to the caller
//! as-is.

use thiserror::Error;

use crate::decision::{Decision, DenyReason};
use crate::options::{Defaults, ValidateOptions};
use crate::validate::validate;

/// Errors from the fetch wrapper.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Option resolution failed before any decision was made.
    #[error(transparent)]
    Config(#[from] crate::Error),

    /// Validation denied the URL; no request was made.
    #[error("fetch denied: {0}")]
    Denied(DenyReason),

    /// The request itself failed after validation allowed it.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Validate `url` and, if allowed, issue a blocking GET for it.
///
/// # Example
///
/// ```rust,no_run
/// use urlwarden::{fetch, Defaults, ValidateOptions};
///
/// # fn example() -> Result<(), urlwarden::FetchError> {
/// let defaults = Defaults::default();
/// let response = fetch("https://example.com/api", &ValidateOptions::new(), &defaults)?;
/// println!("status: {}", response.status());
/// # Ok(())
/// # }
/// ```
pub fn fetch(
    url: &str,
    options: &ValidateOptions<'_>,
    defaults: &Defaults,
) -> Result<reqwest::blocking::Response, FetchError> {
    match validate(url, options, defaults)? {
        Decision::Allowed => {}
        Decision::Denied(reason) => return Err(FetchError::Denied(reason)),
    }

    let client = reqwest::blocking::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(client.get(url).send()?)
}
