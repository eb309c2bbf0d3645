//! Registrar credential resolution
//!
//! Credentials come either inline from the solver config or from a secret in
//! the request namespace. They are resolved on every call and never cached,
//! since secrets may rotate between Present and CleanUp.

use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ApiKeySource;
use crate::error::{Error, Result};
use crate::traits::SecretStore;

/// Upper bound for a single secret fetch
pub const SECRET_FETCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Registrar API key and secret
///
/// Values are opaque bytes; no encoding is assumed.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the values.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: Vec<u8>,
    api_secret: Vec<u8>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<REDACTED>")
            .field("api_secret", &"<REDACTED>")
            .finish()
    }
}

impl Credentials {
    /// Create credentials from raw values
    pub fn new(api_key: impl Into<Vec<u8>>, api_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// The API key
    pub fn api_key(&self) -> &[u8] {
        &self.api_key
    }

    /// The API secret
    pub fn api_secret(&self) -> &[u8] {
        &self.api_secret
    }
}

/// Resolve the credentials a request should use
///
/// # Parameters
///
/// - `source`: Inline values or a secret reference
/// - `namespace`: Namespace of the challenge request
/// - `store`: Secret store, `None` if the solver was never initialized
///
/// # Errors
///
/// - `SecretStoreNotInitialized`: a reference was given but there is no store
/// - `SecretNotFound`: the secret itself is missing
/// - `SecretFieldMissing`: the key or secret field is absent from the secret
/// - `SecretStore`: the fetch failed or exceeded [`SECRET_FETCH_TIMEOUT`]
pub async fn resolve_credentials(
    source: &ApiKeySource,
    namespace: &str,
    store: Option<&dyn SecretStore>,
) -> Result<Credentials> {
    match source {
        ApiKeySource::Inline { key, secret } => {
            if key.is_empty() || secret.is_empty() {
                warn!("Inline registrar credentials are empty; requests will likely be rejected");
            }
            Ok(Credentials::new(key.as_str(), secret.as_str()))
        }
        ApiKeySource::SecretRef {
            name,
            key_field,
            secret_field,
        } => {
            let store = store.ok_or(Error::SecretStoreNotInitialized)?;

            debug!(
                secret = %name,
                namespace = %namespace,
                store = store.store_name(),
                "Loading registrar credentials from secret"
            );

            let data = tokio::time::timeout(SECRET_FETCH_TIMEOUT, store.get_secret(namespace, name))
                .await
                .map_err(|_| {
                    Error::secret_store(format!(
                        "timed out after {}s fetching secret `{}` in namespace `{}`",
                        SECRET_FETCH_TIMEOUT.as_secs(),
                        name,
                        namespace
                    ))
                })??;

            let missing = |field: &str| Error::SecretFieldMissing {
                field: field.to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            };

            // Key and secret may name the same field
            let api_key = data
                .get(key_field)
                .cloned()
                .ok_or_else(|| missing(key_field.as_str()))?;
            let api_secret = data
                .get(secret_field)
                .cloned()
                .ok_or_else(|| missing(secret_field.as_str()))?;

            Ok(Credentials::new(api_key, api_secret))
        }
    }
}
