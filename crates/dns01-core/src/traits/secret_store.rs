// # Secret Store Trait
//
// Defines the interface for resolving named credential resources.
//
// ## Purpose
//
// Solver configurations may reference a secret instead of carrying
// credentials inline. The store maps `(namespace, name)` to a bag of named
// byte fields, the same shape as a Kubernetes `Secret`'s `data`.
//
// ## Implementations
//
// - Kubernetes: `dns01-secret-kube` crate
// - Directory of mounted files: [`crate::secrets::DirectorySecretStore`]
// - In-memory: [`crate::secrets::MemorySecretStore`]

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::SecretStoreConfig;

/// Named byte fields of a secret resource
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Trait for secret store implementations
///
/// # Thread Safety
///
/// A store is created once and then shared read-only between concurrent
/// Present/CleanUp calls.
///
/// # Caching
///
/// Stores must not cache values: credentials may rotate between Present and
/// CleanUp.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a secret
    ///
    /// # Parameters
    ///
    /// - `namespace`: Namespace of the secret
    /// - `name`: Secret name
    ///
    /// # Returns
    ///
    /// - `Ok(SecretData)`: Field map of the secret
    /// - `Err(Error::SecretNotFound)`: The secret does not exist
    /// - `Err(Error)`: Any other store failure
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData, crate::Error>;

    /// Get the store type name (for logging/debugging)
    fn store_name(&self) -> &'static str;
}

/// Helper trait for constructing secret stores from configuration
#[async_trait]
pub trait SecretStoreFactory: Send + Sync {
    /// Create a SecretStore instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Connection configuration for this store
    ///
    /// # Returns
    ///
    /// A shared SecretStore trait object
    async fn create(&self, config: &SecretStoreConfig)
    -> Result<Arc<dyn SecretStore>, crate::Error>;
}
