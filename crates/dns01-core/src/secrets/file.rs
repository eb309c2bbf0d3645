// # Directory Secret Store
//
// File-based implementation of SecretStore.
//
// ## Purpose
//
// Reads secrets mounted into the filesystem, one directory per secret and
// one file per field, the layout produced by Kubernetes secret volumes:
//
// ```text
// <root>/
//   cert-manager/            <- namespace
//     godaddy-creds/         <- secret name
//       api-key              <- field (raw bytes)
//       api-secret
//       ..data -> ..2025_01  <- hidden entries are ignored
// ```
//
// Files are read on every call so rotated secrets are picked up without a
// restart.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use crate::Error;
use crate::config::SecretStoreConfig;
use crate::traits::secret_store::{SecretData, SecretStore, SecretStoreFactory};

/// Secret store reading mounted secret directories
///
/// # Example
///
/// ```rust,no_run
/// use dns01_core::secrets::DirectorySecretStore;
/// use dns01_core::traits::SecretStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = DirectorySecretStore::new("/etc/dns01/secrets");
///     let data = store.get_secret("cert-manager", "godaddy-creds").await?;
///     println!("{} field(s)", data.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DirectorySecretStore {
    root: PathBuf,
}

impl DirectorySecretStore {
    /// Create a store rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate a path component taken from a request
    fn component<'a>(kind: &str, value: &'a str) -> Result<&'a str, Error> {
        if value.is_empty()
            || value.starts_with('.')
            || value.contains('/')
            || value.contains('\\')
        {
            return Err(Error::invalid_input(format!(
                "invalid secret {} '{}'",
                kind, value
            )));
        }
        Ok(value)
    }
}

#[async_trait]
impl SecretStore for DirectorySecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData, Error> {
        let dir = self
            .root
            .join(Self::component("namespace", namespace)?)
            .join(Self::component("name", name)?);

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::secret_not_found(
                    namespace,
                    name,
                    format!("{} does not exist", dir.display()),
                ));
            }
            Err(e) => {
                return Err(Error::secret_store(format!(
                    "Failed to read secret directory {}: {}",
                    dir.display(),
                    e
                )));
            }
        };

        let mut data = SecretData::new();
        while let Some(entry) = entries.next_entry().await? {
            let field = entry.file_name().to_string_lossy().into_owned();
            if field.starts_with('.') {
                continue;
            }

            // Follows symlinks, as mounted secrets are links into a data dir
            let metadata = match fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!("Skipping dangling secret entry {}", entry.path().display());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }

            let value = fs::read(entry.path()).await?;
            data.insert(field, value);
        }

        tracing::debug!(
            "Loaded secret {}/{} from {} ({} field(s))",
            namespace,
            name,
            dir.display(),
            data.len()
        );
        Ok(data)
    }

    fn store_name(&self) -> &'static str {
        "directory"
    }
}

/// Factory for directory secret stores
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectorySecretStoreFactory;

#[async_trait]
impl SecretStoreFactory for DirectorySecretStoreFactory {
    async fn create(&self, config: &SecretStoreConfig) -> Result<Arc<dyn SecretStore>, Error> {
        match config {
            SecretStoreConfig::Directory { path } => {
                let metadata = fs::metadata(path).await.map_err(|e| {
                    Error::config(format!(
                        "Secret directory {} is not accessible: {}",
                        path.display(),
                        e
                    ))
                })?;
                if !metadata.is_dir() {
                    return Err(Error::config(format!(
                        "Secret store path {} is not a directory",
                        path.display()
                    )));
                }
                Ok(Arc::new(DirectorySecretStore::new(path)))
            }
            other => Err(Error::config(format!(
                "Invalid config for directory secret store: {}",
                other.type_name()
            ))),
        }
    }
}
