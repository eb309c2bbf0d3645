// # dns01-core
//
// Core library for DNS-01 challenge solvers backed by registrar APIs.
//
// ## Architecture Overview
//
// An ACME orchestrator asks a solver to publish a TXT record (Present) and
// later to remove it (CleanUp). This crate holds everything that is not
// registrar-specific:
// - **Solver**: Trait the orchestrator drives
// - **ZoneResolver**: Finds the authoritative zone of a challenge FQDN
// - **SecretStore**: Resolves credential references to key/secret bytes
// - **SolverRegistry**: Name-based registry for solvers and secret stores
//
// Registrar implementations live in their own crates
// (`dns01-provider-godaddy`) and register themselves at startup.
//
// ## Design Principles
//
// 1. **Stateless calls**: Config, credentials and zone are re-derived on
//    every Present/CleanUp
// 2. **No retries**: Errors go back to the orchestrator, which owns backoff
// 3. **Plugin-Based**: Providers are registered dynamically, no hard-coded if-else
// 4. **Library-First**: The daemon is a thin shell over these crates

pub mod challenge;
pub mod config;
pub mod credentials;
pub mod error;
pub mod registry;
pub mod secrets;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use challenge::ChallengeRequest;
pub use config::{ApiKeySource, SecretStoreConfig, SolverConfig, SolverSettings, ZoneLookup};
pub use credentials::{Credentials, resolve_credentials};
pub use error::{Error, Result};
pub use registry::SolverRegistry;
pub use secrets::{DirectorySecretStore, MemorySecretStore};
pub use traits::{SecretStore, Solver, ZoneResolver};
pub use zone::{DnsZoneResolver, extract_record_name};
