//! Challenge requests handed to solvers by the orchestrator

use serde::{Deserialize, Serialize};

/// A single DNS-01 validation attempt
///
/// Constructed by the orchestrator, passed by reference and never mutated by
/// solvers. Field names follow the orchestrator's camelCase wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRequest {
    /// Record FQDN in trailing-dot form (e.g. `_acme-challenge.example.com.`)
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,

    /// Zone as seen by the orchestrator, trailing-dot form; may be coarser
    /// than the true zone
    #[serde(rename = "resolvedZone")]
    pub resolved_zone: String,

    /// Proof value to publish
    pub key: String,

    /// Namespace used to scope secret lookups
    #[serde(rename = "resourceNamespace", default)]
    pub resource_namespace: String,

    /// Opaque solver configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl ChallengeRequest {
    /// Create a request without solver configuration
    pub fn new(
        resolved_fqdn: impl Into<String>,
        resolved_zone: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            resolved_fqdn: resolved_fqdn.into(),
            resolved_zone: resolved_zone.into(),
            key: key.into(),
            resource_namespace: String::new(),
            config: None,
        }
    }

    /// Set the resource namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.resource_namespace = namespace.into();
        self
    }

    /// Attach a solver configuration blob
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }
}
