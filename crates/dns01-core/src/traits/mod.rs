//! Core traits for DNS-01 solvers
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Solver`]: Present and clean up challenge records
//! - [`SecretStore`]: Resolve named credential references
//! - [`ZoneResolver`]: Find the authoritative zone for an FQDN

pub mod secret_store;
pub mod solver;
pub mod zone_resolver;

pub use secret_store::{SecretData, SecretStore, SecretStoreFactory};
pub use solver::Solver;
pub use zone_resolver::ZoneResolver;
