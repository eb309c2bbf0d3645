// # Secret Store Implementations
//
// This module provides implementations of the SecretStore trait that need no
// cluster access. The Kubernetes store lives in `dns01-secret-kube`.

pub mod file;
pub mod memory;

pub use file::{DirectorySecretStore, DirectorySecretStoreFactory};
pub use memory::{MemorySecretStore, MemorySecretStoreFactory};

use std::sync::Arc;

use crate::registry::SolverRegistry;

/// Register the built-in directory secret store with a registry
///
/// The memory store is not registered; embedders that want it register a
/// [`MemorySecretStoreFactory`] holding their own store.
pub fn register(registry: &SolverRegistry) {
    registry.register_secret_store("directory", Arc::new(DirectorySecretStoreFactory));
}
