// # Solver Trait
//
// Defines the interface the orchestrator drives for every DNS-01 challenge.
//
// ## Implementations
//
// - GoDaddy: `dns01-provider-godaddy` crate
//
// ## Usage
//
// ```rust,ignore
// use dns01_core::{ChallengeRequest, SecretStoreConfig, Solver};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let solver = /* Solver implementation */;
//     solver.initialize(&SecretStoreConfig::Kubernetes).await?;
//
//     let request = ChallengeRequest::new(
//         "_acme-challenge.example.com.",
//         "example.com.",
//         "proof-value",
//     );
//     solver.present(&request).await?;
//     // ... orchestrator self-check ...
//     solver.clean_up(&request).await?;
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::challenge::ChallengeRequest;
use crate::config::SecretStoreConfig;

/// Trait for DNS-01 challenge solvers
///
/// A solver publishes and removes the TXT record proving control of a domain.
///
/// # Thread Safety
///
/// Implementations must be usable from concurrent tasks. Calls for different
/// FQDNs are independent; calls for the same name are not serialized.
///
/// # Retry Policy
///
/// Solvers return errors instead of retrying. The orchestrator polls
/// Present/CleanUp with its own backoff and runs the propagation self-check;
/// [`crate::Error::is_transient`] helps it decide whether to keep going.
#[async_trait]
pub trait Solver: Send + Sync {
    /// Identifier used to disambiguate solvers registered under one group
    fn name(&self) -> &'static str;

    /// Establish the secret store client
    ///
    /// Called once at startup, before any Present/CleanUp. Calls that only use
    /// inline credentials work without it.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Store established
    /// - `Err(Error)`: The store could not be created, or was already initialized
    async fn initialize(&self, connection: &SecretStoreConfig) -> Result<(), crate::Error>;

    /// Publish the challenge TXT record
    ///
    /// # Idempotency
    ///
    /// Must tolerate being called multiple times with the same request.
    async fn present(&self, request: &ChallengeRequest) -> Result<(), crate::Error>;

    /// Remove the challenge TXT record
    ///
    /// Only the record whose value equals `request.key` may be removed.
    /// Succeeds when the record is already gone.
    async fn clean_up(&self, request: &ChallengeRequest) -> Result<(), crate::Error>;
}
