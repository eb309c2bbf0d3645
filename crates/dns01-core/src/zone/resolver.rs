// # DNS Zone Resolver
//
// Finds the authoritative zone of an FQDN by walking its suffixes and asking
// recursive resolvers for an SOA record at each one.
//
// ## Algorithm
//
// For `_acme-challenge.sub.example.com.` the candidates are, in order:
// `_acme-challenge.sub.example.com.`, `sub.example.com.`, `example.com.`,
// `com.`. The first candidate whose answer section carries an SOA record
// owned by the candidate itself is the zone. NXDOMAIN / empty answers move on
// to the parent. An SOA reached through a CNAME belongs to another zone and is
// skipped the same way.
//
// ## Failure Classification
//
// - Every candidate answered "no such record": `Error::ZoneNotFound` (terminal)
// - Timeouts, unreachable servers, SERVFAIL: `Error::Resolver` (transient)

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{Record, RecordType};
use hickory_resolver::{Name, TokioAsyncResolver};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::{un_fqdn, zone_candidates};
use crate::error::{Error, Result};
use crate::traits::ZoneResolver;

/// Per-query timeout for SOA lookups
const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Zone resolver backed by recursive DNS resolvers
pub struct DnsZoneResolver {
    resolver: TokioAsyncResolver,
}

impl std::fmt::Debug for DnsZoneResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsZoneResolver").finish_non_exhaustive()
    }
}

impl DnsZoneResolver {
    /// Create a resolver
    ///
    /// # Parameters
    ///
    /// - `nameservers`: Recursive resolvers to query. When empty, the system
    ///   configuration is used, falling back to Google public DNS when it
    ///   cannot be read.
    pub fn new(nameservers: &[SocketAddr]) -> Self {
        let (config, mut opts) = if nameservers.is_empty() {
            match hickory_resolver::system_conf::read_system_conf() {
                Ok(system) => system,
                Err(e) => {
                    warn!("Unable to read system resolver configuration ({}), using Google public DNS", e);
                    (ResolverConfig::google(), ResolverOpts::default())
                }
            }
        } else {
            let mut config = ResolverConfig::new();
            for addr in nameservers {
                config.add_name_server(NameServerConfig::new(*addr, Protocol::Udp));
                config.add_name_server(NameServerConfig::new(*addr, Protocol::Tcp));
            }
            (config, ResolverOpts::default())
        };

        // Zones are re-resolved on every call
        opts.cache_size = 0;
        opts.timeout = QUERY_TIMEOUT;
        opts.use_hosts_file = false;

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }

    /// Query the SOA record of one candidate
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: The candidate is the apex of a zone
    /// - `Ok(false)`: It is not; try the parent
    async fn is_zone_apex(&self, candidate: &str) -> Result<bool> {
        let name = Name::from_ascii(candidate)
            .map_err(|e| Error::resolver(candidate, format!("invalid domain name: {}", e)))?;

        let answer = self
            .resolver
            .soa_lookup(name.clone())
            .await
            .map(|lookup| lookup.as_lookup().records().to_vec());

        classify_soa_answer(candidate, &name, answer)
    }
}

/// Decide what an SOA answer says about `name`
///
/// Only an SOA owned by `name` itself marks a zone apex. An SOA owned by
/// another name was reached through a CNAME and belongs to that other zone.
fn classify_soa_answer(
    candidate: &str,
    name: &Name,
    answer: std::result::Result<Vec<Record>, ResolveError>,
) -> Result<bool> {
    match answer {
        Ok(records) => {
            let found = records
                .iter()
                .any(|record| record.record_type() == RecordType::SOA && record.name() == name);
            if !found {
                trace!(candidate = %candidate, "SOA answer is owned by another name (CNAME)");
            }
            Ok(found)
        }
        Err(e) if is_negative_answer(&e) => {
            trace!(candidate = %candidate, "No SOA record at candidate");
            Ok(false)
        }
        Err(e) => Err(Error::resolver(candidate, e.to_string())),
    }
}

/// NXDOMAIN or NOERROR without answers: a definitive "not here"
fn is_negative_answer(error: &ResolveError) -> bool {
    match error.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            matches!(response_code, ResponseCode::NXDomain | ResponseCode::NoError)
        }
        _ => false,
    }
}

/// Walk the suffixes of `fqdn` from longest to shortest
///
/// `is_apex` is asked about each candidate in turn. The first `true` names
/// the zone; an error stops the walk; running out of candidates is
/// `ZoneNotFound`.
async fn walk_candidates<F, Fut>(fqdn: &str, mut is_apex: F) -> Result<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let candidates = zone_candidates(fqdn);
    if candidates.is_empty() {
        return Err(Error::resolver(fqdn, "empty domain name"));
    }

    for candidate in candidates {
        if is_apex(candidate.clone()).await? {
            let zone = un_fqdn(&candidate).to_string();
            debug!(fqdn = %fqdn, zone = %zone, "Resolved authoritative zone");
            return Ok(zone);
        }
    }

    Err(Error::ZoneNotFound {
        fqdn: fqdn.to_string(),
    })
}

#[async_trait]
impl ZoneResolver for DnsZoneResolver {
    async fn find_zone(&self, fqdn: &str) -> Result<String> {
        walk_candidates(fqdn, |candidate| async move { self.is_zone_apex(&candidate).await }).await
    }
}
