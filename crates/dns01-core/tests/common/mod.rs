//! Test doubles and common utilities for contract tests
//!
//! This module provides minimal test doubles that verify behavioral
//! constraints without talking to DNS or a cluster.

#![allow(dead_code)]

use async_trait::async_trait;
use dns01_core::error::{Error, Result};
use dns01_core::traits::{SecretData, SecretStore, ZoneResolver};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A secret store that counts calls and serves a fixed map
pub struct CountingSecretStore {
    secrets: HashMap<(String, String), SecretData>,
    calls: Arc<AtomicUsize>,
}

impl CountingSecretStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            secrets: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a secret with string fields
    pub fn with_secret(mut self, namespace: &str, name: &str, fields: &[(&str, &str)]) -> Self {
        let data = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
            .collect();
        self.secrets
            .insert((namespace.to_string(), name.to_string()), data);
        self
    }

    /// Get the number of get_secret calls
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for CountingSecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.secrets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| Error::secret_not_found(namespace, name, "not found"))
    }

    fn store_name(&self) -> &'static str {
        "counting"
    }
}

/// A secret store whose fetches never complete
pub struct PendingSecretStore;

#[async_trait]
impl SecretStore for PendingSecretStore {
    async fn get_secret(&self, _namespace: &str, _name: &str) -> Result<SecretData> {
        std::future::pending().await
    }

    fn store_name(&self) -> &'static str {
        "pending"
    }
}

/// A zone resolver that answers from a fixed list of zones
///
/// The longest zone that is a suffix of the FQDN wins, the way an SOA walk
/// finds the closest apex first.
pub struct StaticZoneResolver {
    zones: Vec<String>,
    calls: Arc<AtomicUsize>,
}

impl StaticZoneResolver {
    pub fn new(zones: &[&str]) -> Self {
        Self {
            zones: zones.iter().map(|z| z.to_string()).collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ZoneResolver for StaticZoneResolver {
    async fn find_zone(&self, fqdn: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = fqdn.trim_end_matches('.');
        self.zones
            .iter()
            .filter(|zone| name == zone.as_str() || name.ends_with(&format!(".{}", zone)))
            .max_by_key(|zone| zone.len())
            .cloned()
            .ok_or_else(|| Error::ZoneNotFound {
                fqdn: fqdn.to_string(),
            })
    }
}
