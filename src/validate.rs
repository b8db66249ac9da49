//! The policy evaluator.

use crate::decision::{Decision, DenyReason};
use crate::options::{Config, Defaults, ValidateOptions};
use crate::ranges;
use crate::reserved::reserved_nets;
use crate::url_parts::UrlParts;
use crate::Error;

/// Validate a URL against the merged options and defaults.
///
/// This is the primary entry point. It:
/// 1. Merges `options` over `defaults` into a full configuration
/// 2. Parses the URL into scheme and host
/// 3. Resolves the host to an IPv4 address (literal parse first, then the
///    configured resolver)
/// 4. Checks the address against the allowlist, or against the blocklist
///    plus the reserved range set
///
/// # Example
///
/// ```rust
/// use urlwarden::{validate, Decision, Defaults, DenyReason, ValidateOptions};
///
/// # fn example() -> Result<(), urlwarden::Error> {
/// let defaults = Defaults::default();
/// let decision = validate("http://10.0.0.1/", &ValidateOptions::new(), &defaults)?;
/// assert_eq!(decision, Decision::Denied(DenyReason::UnsafeReserved));
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Only configuration problems are errors: a malformed CIDR entry or an
/// option with neither an override nor a default. An unsafe URL is a
/// [`Decision::Denied`], not an `Err` — the evaluator fails closed but
/// never fails loud for merely unsafe input.
pub fn validate(
    url: &str,
    options: &ValidateOptions<'_>,
    defaults: &Defaults,
) -> Result<Decision, Error> {
    let config = options.resolve(defaults)?;
    Ok(evaluate(url, &config))
}

/// Evaluate a URL against an already-resolved [`Config`].
///
/// Pure apart from the resolver call: the same URL and configuration with a
/// deterministic resolver always produce the same decision. Nothing is
/// cached across calls.
pub fn evaluate(url: &str, config: &Config<'_>) -> Decision {
    let parts = UrlParts::split(url);

    // Scheme first. A malformed URL has an empty scheme, which no scheme
    // list contains.
    if !config.accepts_scheme(&parts.scheme) {
        return deny(DenyReason::UnsafeScheme, config);
    }

    // Unresolvable hosts are denied, never allowed by default.
    let Some(ip) = config.resolve_host(&parts.host) else {
        return deny(DenyReason::UnresolvableHost, config);
    };

    // A non-empty allowlist supersedes block logic entirely: neither the
    // custom blocklist nor the reserved set is consulted on this branch.
    if !config.allowlist().is_empty() {
        return if ranges::contains(config.allowlist(), ip) {
            Decision::Allowed
        } else {
            deny(DenyReason::UnsafeAllowlist, config)
        };
    }

    // Reserved ranges are checked before the custom blocklist so that an
    // address covered by both reports the reserved reason.
    if config.block_reserved() && ranges::contains(reserved_nets(), ip) {
        return deny(DenyReason::UnsafeReserved, config);
    }

    if ranges::contains(config.blocklist(), ip) {
        return deny(DenyReason::UnsafeBlocklist, config);
    }

    Decision::Allowed
}

/// Report a denial, collapsing the reason to `restricted` when detailed
/// errors are off. The internal decision logic is unaffected; only the
/// reported code changes.
fn deny(reason: DenyReason, config: &Config<'_>) -> Decision {
    if config.detailed_error() {
        Decision::Denied(reason)
    } else {
        Decision::Denied(DenyReason::Restricted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::StaticResolver;
    use std::net::Ipv4Addr;

    fn public_ip() -> Ipv4Addr {
        Ipv4Addr::new(93, 184, 216, 34)
    }

    // ==================== Reference scenarios ====================

    #[test]
    fn test_reserved_address_denied_by_default() {
        let defaults = Defaults::default();
        let decision = validate("http://10.0.0.1/", &ValidateOptions::new(), &defaults).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::UnsafeReserved));
    }

    #[test]
    fn test_reserved_address_allowed_when_blocking_disabled() {
        let defaults = Defaults::default();
        let options = ValidateOptions::new().block_reserved(false);
        let decision = validate("http://10.0.0.1/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Allowed);
    }

    #[test]
    fn test_scheme_mismatch_denied_regardless_of_address() {
        let resolver = StaticResolver::new().entry("google.com", [public_ip()]);
        let defaults = Defaults::default();
        let options = ValidateOptions::new().schemes(["https"]).resolver(&resolver);
        let decision = validate("http://google.com/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::UnsafeScheme));
    }

    #[test]
    fn test_allowlist_miss_denied() {
        let resolver =
            StaticResolver::new().entry("attacker.test", [Ipv4Addr::new(203, 0, 113, 5)]);
        let defaults = Defaults::default();
        let options = ValidateOptions::new()
            .allowlist(["10.0.0.0/24"])
            .resolver(&resolver);
        let decision = validate("http://attacker.test/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::UnsafeAllowlist));
    }

    #[test]
    fn test_custom_blocklist_denied() {
        let defaults = Defaults::default();
        let options = ValidateOptions::new().blocklist(["203.0.113.0/24"]);
        let decision = validate("http://203.0.113.5/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::UnsafeBlocklist));
    }

    #[test]
    fn test_unresolvable_host_fails_closed() {
        let resolver = StaticResolver::new();
        let defaults = Defaults::default();
        let options = ValidateOptions::new().resolver(&resolver);
        let decision = validate("http://ghost.invalid/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::UnresolvableHost));
    }

    // ==================== Scheme checks ====================

    #[test]
    fn test_scheme_check_precedes_resolution() {
        // No resolver mapping for the host; the scheme denial must win
        // before resolution is even attempted.
        let resolver = StaticResolver::new();
        let defaults = Defaults::default();
        let options = ValidateOptions::new().schemes(["https"]).resolver(&resolver);
        let decision = validate("ftp://ghost.invalid/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::UnsafeScheme));
    }

    #[test]
    fn test_uppercase_scheme_in_url_is_normalized() {
        let defaults = Defaults::default();
        let options = ValidateOptions::new().block_reserved(false);
        let decision = validate("HTTP://10.0.0.1/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Allowed);
    }

    #[test]
    fn test_scheme_membership_is_case_sensitive() {
        // The configured list is matched verbatim against the lower-cased
        // parsed scheme, so an upper-case entry never matches.
        let defaults = Defaults::default();
        let options = ValidateOptions::new().schemes(["HTTP"]);
        let decision = validate("http://203.0.113.5/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::UnsafeScheme));
    }

    #[test]
    fn test_empty_scheme_list_accepts_nothing() {
        let defaults = Defaults::default();
        let options = ValidateOptions::new().schemes(Vec::<String>::new());
        let decision = validate("https://203.0.113.5/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::UnsafeScheme));
    }

    #[test]
    fn test_malformed_url_denied_via_scheme_path() {
        let defaults = Defaults::default();
        let decision = validate("not a url", &ValidateOptions::new(), &defaults).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::UnsafeScheme));
    }

    #[test]
    fn test_url_without_host_fails_closed() {
        // file-style URLs parse with an accepted scheme but no host; the
        // empty host resolves to no address and is denied.
        let defaults = Defaults::default();
        let options = ValidateOptions::new().schemes(["unix"]);
        let decision = validate("unix:///var/run/sock", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::UnresolvableHost));
    }

    // ==================== Reserved set coverage ====================

    #[test]
    fn test_reserved_ranges_denied_by_default() {
        let defaults = Defaults::default();
        for url in [
            "http://127.0.0.1/",
            "http://169.254.169.254/latest/meta-data/",
            "http://192.168.1.1/",
            "http://172.16.0.1/",
            "http://100.64.0.1/",
            "http://0.0.0.0/",
            "http://224.0.0.1/",
            "http://198.51.100.7/",
        ] {
            let decision = validate(url, &ValidateOptions::new(), &defaults).unwrap();
            assert_eq!(
                decision,
                Decision::Denied(DenyReason::UnsafeReserved),
                "{url} should be denied as reserved"
            );
        }
    }

    #[test]
    fn test_public_address_allowed_by_default() {
        let defaults = Defaults::default();
        let decision = validate("http://93.184.216.34/", &ValidateOptions::new(), &defaults)
            .unwrap();
        assert_eq!(decision, Decision::Allowed);
    }

    #[test]
    fn test_resolved_hostname_hits_reserved_set() {
        let resolver = StaticResolver::new().entry("intranet.test", [Ipv4Addr::new(10, 1, 2, 3)]);
        let defaults = Defaults::default();
        let options = ValidateOptions::new().resolver(&resolver);
        let decision = validate("http://intranet.test/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::UnsafeReserved));
    }

    #[test]
    fn test_only_first_resolved_address_is_checked() {
        // First answer public, second reserved: the decision follows the
        // first answer only. Documented limitation.
        let resolver = StaticResolver::new()
            .entry("pair.test", [public_ip(), Ipv4Addr::new(127, 0, 0, 1)]);
        let defaults = Defaults::default();
        let options = ValidateOptions::new().resolver(&resolver);
        let decision = validate("http://pair.test/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Allowed);
    }

    // ==================== Blocklist path ====================

    #[test]
    fn test_blocklist_adds_to_reserved_set() {
        let defaults = Defaults::default();
        let options = ValidateOptions::new().blocklist(["93.184.216.0/24"]);

        let blocked = validate("http://93.184.216.34/", &options, &defaults).unwrap();
        assert_eq!(blocked, Decision::Denied(DenyReason::UnsafeBlocklist));

        // Reserved set still applies alongside the custom list.
        let reserved = validate("http://10.0.0.1/", &options, &defaults).unwrap();
        assert_eq!(reserved, Decision::Denied(DenyReason::UnsafeReserved));
    }

    #[test]
    fn test_reserved_reason_wins_when_both_match() {
        // 10.0.0.0/8 is both reserved and explicitly blocklisted; the
        // reserved attribution takes precedence.
        let defaults = Defaults::default();
        let options = ValidateOptions::new().blocklist(["10.0.0.0/8"]);
        let decision = validate("http://10.0.0.1/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::UnsafeReserved));
    }

    #[test]
    fn test_blocklist_applies_without_reserved_blocking() {
        let defaults = Defaults::default();
        let options = ValidateOptions::new()
            .block_reserved(false)
            .blocklist(["10.0.0.0/8"]);
        let decision = validate("http://10.0.0.1/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::UnsafeBlocklist));
    }

    #[test]
    fn test_reserved_allowed_when_disabled_and_not_blocklisted() {
        let defaults = Defaults::default();
        let options = ValidateOptions::new()
            .block_reserved(false)
            .blocklist(["203.0.113.0/24"]);
        let decision = validate("http://192.168.1.1/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Allowed);
    }

    // ==================== Allowlist path ====================

    #[test]
    fn test_allowlist_hit_allowed_even_if_reserved() {
        let defaults = Defaults::default();
        let options = ValidateOptions::new().allowlist(["10.0.0.0/24"]);
        let decision = validate("http://10.0.0.1/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Allowed);
    }

    #[test]
    fn test_allowlist_supersedes_block_logic_entirely() {
        // With a fixed non-empty allowlist, toggling block_reserved or
        // mutating the blocklist must never change the decision.
        let defaults = Defaults::default();
        let ip_in = "http://10.0.0.1/";
        let ip_out = "http://203.0.113.5/";

        for block_reserved in [true, false] {
            for blocklist in [vec![], vec!["10.0.0.0/8".to_string()]] {
                let options = ValidateOptions::new()
                    .allowlist(["10.0.0.0/24"])
                    .block_reserved(block_reserved)
                    .blocklist(blocklist.clone());

                assert_eq!(
                    validate(ip_in, &options, &defaults).unwrap(),
                    Decision::Allowed
                );
                assert_eq!(
                    validate(ip_out, &options, &defaults).unwrap(),
                    Decision::Denied(DenyReason::UnsafeAllowlist)
                );
            }
        }
    }

    #[test]
    fn test_allowlist_unresolvable_host_still_denied() {
        let resolver = StaticResolver::new();
        let defaults = Defaults::default();
        let options = ValidateOptions::new()
            .allowlist(["0.0.0.0/0"])
            .resolver(&resolver);
        let decision = validate("http://ghost.invalid/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Denied(DenyReason::UnresolvableHost));
    }

    // ==================== detailed_error collapse ====================

    #[test]
    fn test_generic_reason_collapses_every_denial() {
        let resolver = StaticResolver::new();
        let defaults = Defaults::default();

        let cases: Vec<ValidateOptions> = vec![
            ValidateOptions::new().schemes(["https"]),
            ValidateOptions::new(),
            ValidateOptions::new().blocklist(["203.0.113.0/24"]),
            ValidateOptions::new().allowlist(["198.51.100.0/24"]),
            ValidateOptions::new().resolver(&resolver),
        ];
        let urls = [
            "http://10.0.0.1/",
            "http://10.0.0.1/",
            "http://203.0.113.5/",
            "http://203.0.113.5/",
            "http://ghost.invalid/",
        ];

        for (options, url) in cases.into_iter().zip(urls) {
            let decision = validate(url, &options.detailed_error(false), &defaults).unwrap();
            assert_eq!(
                decision,
                Decision::Denied(DenyReason::Restricted),
                "{url} should collapse to restricted"
            );
        }
    }

    #[test]
    fn test_generic_reason_never_changes_an_allow() {
        let defaults = Defaults::default();
        let options = ValidateOptions::new().detailed_error(false);
        let decision = validate("http://93.184.216.34/", &options, &defaults).unwrap();
        assert_eq!(decision, Decision::Allowed);
        assert_eq!(decision.code(), "ok");
    }

    // ==================== Determinism ====================

    #[test]
    fn test_repeated_evaluation_is_idempotent() {
        let resolver = StaticResolver::new().entry("stable.test", [public_ip()]);
        let defaults = Defaults::default();
        let options = ValidateOptions::new().resolver(&resolver);
        let config = options.resolve(&defaults).unwrap();

        let first = evaluate("http://stable.test/", &config);
        for _ in 0..10 {
            assert_eq!(evaluate("http://stable.test/", &config), first);
        }
    }
}
