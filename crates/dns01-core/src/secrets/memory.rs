// # Memory Secret Store
//
// In-memory implementation of SecretStore.
//
// ## Purpose
//
// Provides a simple secret store for tests and for embedding the solvers in
// a process that already holds the credentials. Nothing is persisted.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::config::SecretStoreConfig;
use crate::traits::secret_store::{SecretData, SecretStore, SecretStoreFactory};

/// In-memory secret store implementation
///
/// Secrets are keyed by `(namespace, name)` and protected by a RwLock.
/// Clones share the same underlying map.
///
/// # Example
///
/// ```rust,no_run
/// use dns01_core::secrets::MemorySecretStore;
/// use dns01_core::traits::SecretStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemorySecretStore::new();
///     store
///         .insert("cert-manager", "godaddy-creds", [("api-key", "K"), ("api-secret", "S")])
///         .await;
///
///     let data = store.get_secret("cert-manager", "godaddy-creds").await?;
///     assert_eq!(data["api-key"], b"K");
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    inner: Arc<RwLock<HashMap<(String, String), SecretData>>>,
}

impl MemorySecretStore {
    /// Create a new empty memory secret store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a secret
    pub async fn insert<I, K, V>(&self, namespace: &str, name: &str, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let data: SecretData = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let mut guard = self.inner.write().await;
        guard.insert((namespace.to_string(), name.to_string()), data);
    }

    /// Remove a secret
    pub async fn remove(&self, namespace: &str, name: &str) {
        let mut guard = self.inner.write().await;
        guard.remove(&(namespace.to_string(), name.to_string()));
    }

    /// Get the number of secrets in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData, Error> {
        let guard = self.inner.read().await;
        guard
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| Error::secret_not_found(namespace, name, "secret does not exist"))
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory handing out a shared [`MemorySecretStore`]
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStoreFactory {
    store: MemorySecretStore,
}

impl MemorySecretStoreFactory {
    /// Create a factory that hands out `store`
    pub fn new(store: MemorySecretStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SecretStoreFactory for MemorySecretStoreFactory {
    async fn create(&self, config: &SecretStoreConfig) -> Result<Arc<dyn SecretStore>, Error> {
        match config {
            SecretStoreConfig::Memory => Ok(Arc::new(self.store.clone())),
            other => Err(Error::config(format!(
                "Invalid config for memory secret store: {}",
                other.type_name()
            ))),
        }
    }
}
