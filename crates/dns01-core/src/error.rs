//! Error types for DNS-01 solvers
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for DNS-01 solvers
#[derive(Error, Debug)]
pub enum Error {
    /// The per-request solver configuration could not be decoded
    #[error("error decoding solver config: {0}")]
    ConfigDecode(String),

    /// No ancestor of the FQDN answered with an SOA record
    #[error("could not find the authoritative zone for '{fqdn}'")]
    ZoneNotFound {
        /// The FQDN being resolved
        fqdn: String,
    },

    /// The recursive lookup itself failed (timeout, unreachable, SERVFAIL)
    #[error("DNS resolver error while looking up '{fqdn}': {message}")]
    Resolver {
        /// The name being queried when the failure happened
        fqdn: String,
        /// Resolver error message
        message: String,
    },

    /// The referenced secret resource does not exist
    #[error("unable to get secret `{name}` in namespace `{namespace}`: {message}")]
    SecretNotFound {
        /// Namespace of the secret
        namespace: String,
        /// Name of the secret
        name: String,
        /// Store-specific detail
        message: String,
    },

    /// The secret exists but a referenced field is absent
    #[error("field `{field}` not found in secret \"{namespace}/{name}\"")]
    SecretFieldMissing {
        /// The missing field name
        field: String,
        /// Namespace of the secret
        namespace: String,
        /// Name of the secret
        name: String,
    },

    /// The secret store failed for a reason other than a missing secret
    #[error("secret store error: {0}")]
    SecretStore(String),

    /// A secret reference was used before `initialize` established a store
    #[error("secret store has not been initialized")]
    SecretStoreNotInitialized,

    /// The registrar answered with an unexpected HTTP status
    #[error("registrar API error: {operation} {target} returned status {status}; body: {body}")]
    RegistrarApi {
        /// The operation being performed (e.g. "list records")
        operation: String,
        /// The zone/record the operation targeted
        target: String,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// HTTP transport errors (connection, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Startup configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config decode error
    pub fn config_decode(msg: impl Into<String>) -> Self {
        Self::ConfigDecode(msg.into())
    }

    /// Create a resolver error
    pub fn resolver(fqdn: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolver {
            fqdn: fqdn.into(),
            message: message.into(),
        }
    }

    /// Create a "secret not found" error
    pub fn secret_not_found(
        namespace: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::SecretNotFound {
            namespace: namespace.into(),
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a secret store error
    pub fn secret_store(msg: impl Into<String>) -> Self {
        Self::SecretStore(msg.into())
    }

    /// Create a registrar API error
    pub fn registrar_api(
        operation: impl Into<String>,
        target: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self::RegistrarApi {
            operation: operation.into(),
            target: target.into(),
            status,
            body: body.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the orchestrator may reasonably retry the call that failed
    ///
    /// Solvers never retry on their own. Zone-not-found, decode errors and
    /// missing secrets are terminal until someone changes configuration or DNS.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Resolver { .. } | Self::Http(_) | Self::SecretStore(_) => true,
            Self::RegistrarApi { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
