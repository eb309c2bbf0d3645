//! Configuration types for DNS-01 solvers
//!
//! Two kinds of configuration live here:
//!
//! - [`SolverConfig`]: decoded from the opaque `config` blob of every
//!   challenge request (credentials source, environment, TTL)
//! - [`SolverSettings`] and [`SecretStoreConfig`]: startup configuration
//!   handed to solvers at construction/initialization time

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default user agent sent to registrar APIs
pub const DEFAULT_USER_AGENT: &str = concat!("dns01-solver/", env!("CARGO_PKG_VERSION"));

/// Per-request solver configuration
///
/// Decoded once per Present/CleanUp call; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Where the registrar API key and secret come from
    pub api_key: ApiKeySource,

    /// Use the production registrar endpoint instead of staging
    pub production: bool,

    /// TTL hint in seconds; 0 means "provider default"
    pub ttl: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            api_key: ApiKeySource::Inline {
                key: String::new(),
                secret: String::new(),
            },
            production: false,
            ttl: 0,
        }
    }
}

impl SolverConfig {
    /// Decode the configuration attached to a challenge request
    ///
    /// An absent (or `null`) blob yields [`SolverConfig::default`]. Anything
    /// else must match the schema exactly: unknown fields, wrong types and
    /// missing required fields are reported as [`crate::Error::ConfigDecode`].
    pub fn decode(raw: Option<&serde_json::Value>) -> Result<Self, crate::Error> {
        let raw = match raw {
            None | Some(serde_json::Value::Null) => {
                tracing::warn!("Solver config is not defined, using defaults");
                return Ok(Self::default());
            }
            Some(raw) => raw,
        };

        let wire: WireSolverConfig = serde_json::from_value(raw.clone())
            .map_err(|e| crate::Error::config_decode(e.to_string()))?;

        Ok(Self {
            api_key: ApiKeySource::try_from(wire.api_key_secret_ref)?,
            production: wire.production,
            ttl: wire.ttl,
        })
    }
}

/// Source of the registrar API credentials
#[derive(Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Literal credential values
    Inline {
        /// API key
        key: String,
        /// API secret
        secret: String,
    },

    /// Field names inside a secret resource in the request namespace
    SecretRef {
        /// Secret resource name
        name: String,
        /// Field holding the API key
        key_field: String,
        /// Field holding the API secret
        secret_field: String,
    },
}

// Inline credentials are literal secrets and must not reach logs
impl std::fmt::Debug for ApiKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiKeySource::Inline { .. } => f
                .debug_struct("Inline")
                .field("key", &"<REDACTED>")
                .field("secret", &"<REDACTED>")
                .finish(),
            ApiKeySource::SecretRef {
                name,
                key_field,
                secret_field,
            } => f
                .debug_struct("SecretRef")
                .field("name", name)
                .field("key_field", key_field)
                .field("secret_field", secret_field)
                .finish(),
        }
    }
}

impl TryFrom<SecretKeySelector> for ApiKeySource {
    type Error = crate::Error;

    fn try_from(selector: SecretKeySelector) -> Result<Self, Self::Error> {
        match selector.name {
            Some(name) if name.is_empty() => Err(crate::Error::config_decode(
                "apiKeySecretRef.name must not be empty when set",
            )),
            Some(name) => {
                if selector.key.is_empty() || selector.secret.is_empty() {
                    return Err(crate::Error::config_decode(format!(
                        "apiKeySecretRef for secret `{}` must name both the key and secret fields",
                        name
                    )));
                }
                Ok(ApiKeySource::SecretRef {
                    name,
                    key_field: selector.key,
                    secret_field: selector.secret,
                })
            }
            None => Ok(ApiKeySource::Inline {
                key: selector.key,
                secret: selector.secret,
            }),
        }
    }
}

/// Wire form of the credentials reference
///
/// When `name` is set, `key` and `secret` are field names within that secret.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretKeySelector {
    /// Name of the secret resource
    #[serde(default)]
    pub name: Option<String>,

    /// API key, or the field holding it
    pub key: String,

    /// API secret, or the field holding it
    pub secret: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct WireSolverConfig {
    #[serde(alias = "apiKeySecret")]
    api_key_secret_ref: SecretKeySelector,

    #[serde(default)]
    production: bool,

    #[serde(default)]
    ttl: u32,
}

/// How the solver derives the zone for a challenge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneLookup {
    /// Resolve the authoritative zone of `resolvedFQDN` via DNS
    #[default]
    Resolve,
    /// Trust the orchestrator's `resolvedZone`
    Request,
}

impl std::str::FromStr for ZoneLookup {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "resolve" => Ok(ZoneLookup::Resolve),
            "request" => Ok(ZoneLookup::Request),
            other => Err(crate::Error::config(format!(
                "unknown zone lookup mode '{}' (expected resolve or request)",
                other
            ))),
        }
    }
}

/// Startup settings shared by every call a solver handles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverSettings {
    /// API group the solver is registered under
    pub group_name: String,

    /// Zone derivation mode
    pub zone_lookup: ZoneLookup,

    /// Override for the registrar base URL (staging/production selection is
    /// bypassed when set)
    pub api_base_url: Option<String>,

    /// User agent sent to the registrar
    pub user_agent: String,
}

impl SolverSettings {
    /// Create settings for the given group with defaults for everything else
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            zone_lookup: ZoneLookup::default(),
            api_base_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set the zone lookup mode
    pub fn with_zone_lookup(mut self, zone_lookup: ZoneLookup) -> Self {
        self.zone_lookup = zone_lookup;
        self
    }

    /// Override the registrar base URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.group_name.trim().is_empty() {
            return Err(crate::Error::config("group name must be specified"));
        }

        if let Some(ref url) = self.api_base_url
            && !url.starts_with("https://")
            && !url.starts_with("http://")
        {
            return Err(crate::Error::config(format!(
                "API base URL must use HTTP or HTTPS scheme. Got: {}",
                url
            )));
        }

        if self.user_agent.is_empty() {
            return Err(crate::Error::config("user agent cannot be empty"));
        }

        Ok(())
    }
}

/// Secret store connection configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecretStoreConfig {
    /// Kubernetes `Secret` resources, client inferred from the environment
    #[default]
    Kubernetes,

    /// Mounted secrets laid out as `<path>/<namespace>/<name>/<field>`
    Directory {
        /// Root directory
        path: PathBuf,
    },

    /// In-process store (tests and embedding)
    Memory,
}

impl SecretStoreConfig {
    /// Get the store type name used for factory lookup
    pub fn type_name(&self) -> &'static str {
        match self {
            SecretStoreConfig::Kubernetes => "kubernetes",
            SecretStoreConfig::Directory { .. } => "directory",
            SecretStoreConfig::Memory => "memory",
        }
    }
}
