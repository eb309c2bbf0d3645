// # GoDaddy DNS-01 Solver
//
// This crate provides a DNS-01 solver that publishes challenge TXT records
// through the GoDaddy Domains API v1.
//
// ## Behavior
//
// - One logical operation per Present/CleanUp call, no retries
// - Errors carry the registrar's status and body and go straight back to the
//   orchestrator, which owns backoff
// - Credentials are resolved on every call and never logged
// - HTTP timeout configured (30 seconds)
// - Staging (OTE) endpoint unless the request config sets `production`
//
// ## Security Requirements
//
// - API key and secret NEVER appear in logs or Debug output
// - The Authorization header is marked sensitive
//
// ## API Reference
//
// - GoDaddy Domains API: https://developer.godaddy.com/doc/endpoint/domains

pub mod client;
pub mod solver;

pub use client::{DnsRecord, GoDaddyClient, PRODUCTION_API_BASE, STAGING_API_BASE};
pub use solver::{GoDaddySolver, SOLVER_NAME};

use dns01_core::SolverRegistry;
use std::sync::Arc;

/// Register a GoDaddy solver with a registry
///
/// # Example
///
/// ```rust,no_run
/// use dns01_core::{DnsZoneResolver, SolverRegistry, SolverSettings};
/// use dns01_core::secrets::DirectorySecretStoreFactory;
/// use dns01_provider_godaddy::GoDaddySolver;
/// use std::sync::Arc;
///
/// # fn try_main() -> dns01_core::Result<()> {
/// let registry = SolverRegistry::new();
/// let solver = GoDaddySolver::new(
///     SolverSettings::new("acme.example.org"),
///     Arc::new(DnsZoneResolver::new(&[])),
///     Arc::new(DirectorySecretStoreFactory),
/// )?;
/// dns01_provider_godaddy::register(&registry, solver);
/// assert!(registry.has_solver("godaddy"));
/// # Ok(())
/// # }
/// ```
pub fn register(registry: &SolverRegistry, solver: GoDaddySolver) {
    registry.register_solver(Arc::new(solver));
}
