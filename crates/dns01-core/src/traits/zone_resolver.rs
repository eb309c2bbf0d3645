// # Zone Resolver Trait
//
// Finds the authoritative DNS zone for a fully-qualified domain name.
//
// ## Implementations
//
// - DNS (SOA walk over recursive resolvers): [`crate::zone::DnsZoneResolver`]

use async_trait::async_trait;

/// Trait for zone resolver implementations
#[async_trait]
pub trait ZoneResolver: Send + Sync {
    /// Find the authoritative zone for an FQDN
    ///
    /// # Parameters
    ///
    /// - `fqdn`: The domain name, trailing dot tolerated
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The zone without its trailing dot (e.g. `example.com`)
    /// - `Err(Error::ZoneNotFound)`: No ancestor answered (terminal)
    /// - `Err(Error::Resolver)`: The lookup itself failed (transient)
    async fn find_zone(&self, fqdn: &str) -> Result<String, crate::Error>;
}
