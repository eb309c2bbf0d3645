//! Plugin-based solver registry
//!
//! Solvers and secret store backends register themselves at startup, so the
//! daemon dispatches on names instead of hard-coding providers.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dns01_core::registry::SolverRegistry;
//!
//! let registry = SolverRegistry::new();
//!
//! // In the provider crate
//! dns01_provider_godaddy::register(&registry, solver);
//!
//! // In the daemon
//! let solver = registry.solver("godaddy")?;
//! solver.present(&request).await?;
//! ```

use crate::config::SecretStoreConfig;
use crate::error::{Error, Result};
use crate::traits::{SecretStore, SecretStoreFactory, Solver};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry of solvers and secret store factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct SolverRegistry {
    /// Registered solvers, keyed by [`Solver::name`]
    solvers: RwLock<HashMap<String, Arc<dyn Solver>>>,

    /// Registered secret store factories, keyed by store type
    secret_stores: RwLock<HashMap<String, Arc<dyn SecretStoreFactory>>>,
}

impl std::fmt::Debug for SolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverRegistry")
            .field("solvers", &self.list_solvers())
            .field("secret_stores", &self.list_secret_stores())
            .finish()
    }
}

impl SolverRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a solver under its own name
    ///
    /// A solver registered under an existing name replaces the previous one.
    pub fn register_solver(&self, solver: Arc<dyn Solver>) {
        let name = solver.name().to_string();
        tracing::debug!("Registering solver '{}'", name);
        let mut solvers = self.solvers.write().unwrap_or_else(PoisonError::into_inner);
        solvers.insert(name, solver);
    }

    /// Register a secret store factory
    ///
    /// # Parameters
    ///
    /// - `name`: Store type name (e.g., "kubernetes", "directory")
    /// - `factory`: Factory object for creating store instances
    pub fn register_secret_store(
        &self,
        name: impl Into<String>,
        factory: Arc<dyn SecretStoreFactory>,
    ) {
        let name = name.into();
        let mut stores = self
            .secret_stores
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        stores.insert(name, factory);
    }

    /// Look up a solver by name
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn Solver>)`: The registered solver
    /// - `Err(Error::Config)`: No solver has that name
    pub fn solver(&self, name: &str) -> Result<Arc<dyn Solver>> {
        let solvers = self.solvers.read().unwrap_or_else(PoisonError::into_inner);
        solvers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown solver: {}", name)))
    }

    /// Look up the factory for a secret store type
    pub fn secret_store_factory(&self, name: &str) -> Result<Arc<dyn SecretStoreFactory>> {
        let stores = self
            .secret_stores
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        stores
            .get(name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown secret store type: {}", name)))
    }

    /// Create a secret store from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn SecretStore>)`: Created store instance
    /// - `Err(Error)`: If the store type is not registered or creation fails
    pub async fn create_secret_store(
        &self,
        config: &SecretStoreConfig,
    ) -> Result<Arc<dyn SecretStore>> {
        // Lock is released before the async create
        let factory = self.secret_store_factory(config.type_name())?;
        factory.create(config).await
    }

    /// List all registered solver names
    pub fn list_solvers(&self) -> Vec<String> {
        let solvers = self.solvers.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = solvers.keys().cloned().collect();
        names.sort();
        names
    }

    /// List all registered secret store types
    pub fn list_secret_stores(&self) -> Vec<String> {
        let stores = self
            .secret_stores
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = stores.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a solver is registered
    pub fn has_solver(&self, name: &str) -> bool {
        let solvers = self.solvers.read().unwrap_or_else(PoisonError::into_inner);
        solvers.contains_key(name)
    }

    /// Check if a secret store type is registered
    pub fn has_secret_store(&self, name: &str) -> bool {
        let stores = self
            .secret_stores
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        stores.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::ChallengeRequest;
    use crate::secrets::{MemorySecretStore, MemorySecretStoreFactory};
    use async_trait::async_trait;

    struct MockSolver;

    #[async_trait]
    impl Solver for MockSolver {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn initialize(&self, _connection: &SecretStoreConfig) -> Result<()> {
            Ok(())
        }

        async fn present(&self, _request: &ChallengeRequest) -> Result<()> {
            Ok(())
        }

        async fn clean_up(&self, _request: &ChallengeRequest) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_solver_registration() {
        let registry = SolverRegistry::new();

        // Initially empty
        assert!(!registry.has_solver("mock"));
        assert!(matches!(registry.solver("mock"), Err(Error::Config(_))));

        registry.register_solver(Arc::new(MockSolver));

        assert!(registry.has_solver("mock"));
        assert_eq!(registry.list_solvers(), vec!["mock".to_string()]);
        assert_eq!(registry.solver("mock").unwrap().name(), "mock");
    }

    #[tokio::test]
    async fn test_secret_store_creation() {
        let registry = SolverRegistry::new();
        let store = MemorySecretStore::new();
        store.insert("default", "creds", [("api-key", "K")]).await;

        registry.register_secret_store("memory", Arc::new(MemorySecretStoreFactory::new(store)));
        assert!(registry.has_secret_store("memory"));

        let created = registry
            .create_secret_store(&SecretStoreConfig::Memory)
            .await
            .unwrap();
        assert_eq!(created.store_name(), "memory");
        assert!(created.get_secret("default", "creds").await.is_ok());

        let unknown = registry
            .create_secret_store(&SecretStoreConfig::Kubernetes)
            .await;
        assert!(matches!(unknown, Err(Error::Config(_))));
    }
}
