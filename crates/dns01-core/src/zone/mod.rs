//! Zone and record-name derivation
//!
//! Pure helpers for turning a challenge FQDN into the `(zone, label)` pair a
//! registrar API expects, plus the DNS-backed [`DnsZoneResolver`].

mod resolver;

pub use resolver::DnsZoneResolver;

use crate::challenge::ChallengeRequest;
use crate::config::ZoneLookup;
use crate::error::{Error, Result};
use crate::traits::ZoneResolver;

/// Strip a single trailing root dot
pub fn un_fqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Derive the record label of `fqdn` relative to `zone`
///
/// Both names are compared without their trailing dot. When `fqdn` does not
/// end with `"." + zone` (for instance a stale zone from the orchestrator), the
/// whole FQDN without its trailing dot is returned.
///
/// ```
/// use dns01_core::zone::extract_record_name;
///
/// assert_eq!(
///     extract_record_name("_acme-challenge.example.com.", "example.com"),
///     "_acme-challenge"
/// );
/// assert_eq!(extract_record_name("example.org.", "example.com"), "example.org");
/// ```
pub fn extract_record_name(fqdn: &str, zone: &str) -> String {
    let fqdn = un_fqdn(fqdn);
    let zone = un_fqdn(zone);

    if !zone.is_empty()
        && let Some(label) = fqdn.strip_suffix(zone).and_then(|rest| rest.strip_suffix('.'))
        && !label.is_empty()
    {
        return label.to_string();
    }

    fqdn.to_string()
}

/// Candidate zones for `fqdn`, most specific first, in trailing-dot form
///
/// The root zone is never a candidate.
pub fn zone_candidates(fqdn: &str) -> Vec<String> {
    let name = un_fqdn(fqdn);
    if name.is_empty() {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    let mut rest = name;
    loop {
        candidates.push(format!("{}.", rest));
        match rest.split_once('.') {
            Some((_, parent)) if !parent.is_empty() => rest = parent,
            _ => break,
        }
    }
    candidates
}

/// Determine the zone a challenge request should be published under
///
/// The zone is re-derived on every call so zone changes between Present and
/// CleanUp are picked up.
pub async fn zone_for_request(
    resolver: &dyn ZoneResolver,
    lookup: ZoneLookup,
    request: &ChallengeRequest,
) -> Result<String> {
    match lookup {
        ZoneLookup::Resolve => resolver.find_zone(&request.resolved_fqdn).await,
        ZoneLookup::Request => {
            let zone = un_fqdn(&request.resolved_zone);
            if zone.is_empty() {
                return Err(Error::invalid_input(format!(
                    "challenge for '{}' carries no resolved zone",
                    request.resolved_fqdn
                )));
            }
            Ok(zone.to_string())
        }
    }
}
