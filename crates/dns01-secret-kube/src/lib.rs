// # Kubernetes Secret Store
//
// This crate provides a SecretStore backed by Kubernetes `Secret` resources.
//
// ## Client Configuration
//
// The client is inferred from the environment: the in-cluster service
// account when running in a pod, the local kubeconfig otherwise. The service
// account needs `get` on `secrets` in every namespace challenges come from.
//
// ## Behavior
//
// - One GET per lookup, no watch and no cache (secrets may rotate)
// - A missing secret is `Error::SecretNotFound`
// - Any other API failure (RBAC, connectivity) is `Error::SecretStore`

use async_trait::async_trait;
use dns01_core::config::SecretStoreConfig;
use dns01_core::traits::{SecretData, SecretStore, SecretStoreFactory};
use dns01_core::{Error, Result, SolverRegistry};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use std::sync::Arc;

/// Secret store reading Kubernetes secrets
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl std::fmt::Debug for KubeSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeSecretStore").finish_non_exhaustive()
    }
}

impl KubeSecretStore {
    /// Create a store using an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a store with a client inferred from the environment
    pub async fn try_default() -> Result<Self> {
        let client = Client::try_default().await.map_err(|e| {
            Error::secret_store(format!("unable to create Kubernetes client: {}", e))
        })?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);

        let secret = secrets
            .get_opt(name)
            .await
            .map_err(|e| {
                Error::secret_store(format!(
                    "unable to get secret `{}` in namespace `{}`: {}",
                    name, namespace, e
                ))
            })?
            .ok_or_else(|| Error::secret_not_found(namespace, name, "secret does not exist"))?;

        let data = secret_data(secret);
        tracing::debug!(
            "Fetched secret {}/{} ({} field(s))",
            namespace,
            name,
            data.len()
        );
        Ok(data)
    }

    fn store_name(&self) -> &'static str {
        "kubernetes"
    }
}

/// Field map of a secret; a secret without data has no fields
fn secret_data(secret: Secret) -> SecretData {
    secret
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|(field, value)| (field, value.0))
        .collect()
}

/// Factory for Kubernetes secret stores
#[derive(Debug, Clone, Copy, Default)]
pub struct KubeSecretStoreFactory;

#[async_trait]
impl SecretStoreFactory for KubeSecretStoreFactory {
    async fn create(&self, config: &SecretStoreConfig) -> Result<Arc<dyn SecretStore>> {
        match config {
            SecretStoreConfig::Kubernetes => Ok(Arc::new(KubeSecretStore::try_default().await?)),
            other => Err(Error::config(format!(
                "Invalid config for Kubernetes secret store: {}",
                other.type_name()
            ))),
        }
    }
}

/// Register the Kubernetes secret store with a registry
///
/// # Example
///
/// ```rust
/// use dns01_core::SolverRegistry;
///
/// let registry = SolverRegistry::new();
/// dns01_secret_kube::register(&registry);
/// assert!(registry.has_secret_store("kubernetes"));
/// ```
pub fn register(registry: &SolverRegistry) {
    registry.register_secret_store("kubernetes", Arc::new(KubeSecretStoreFactory));
}
