//! Test doubles and common utilities for registrar contract tests
//!
//! The registrar is a wiremock server; DNS is replaced by a resolver that
//! answers from a fixed list of zones.

#![allow(dead_code)]

use async_trait::async_trait;
use dns01_core::challenge::ChallengeRequest;
use dns01_core::config::SolverSettings;
use dns01_core::error::{Error, Result};
use dns01_core::secrets::{MemorySecretStore, MemorySecretStoreFactory};
use dns01_core::traits::ZoneResolver;
use dns01_provider_godaddy::GoDaddySolver;
use serde_json::{Value, json};
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use wiremock::MockServer;

/// Zone resolver answering from a fixed list of zones
pub struct StaticZoneResolver {
    zones: Vec<String>,
}

impl StaticZoneResolver {
    pub fn new(zones: &[&str]) -> Self {
        Self {
            zones: zones.iter().map(|z| z.to_string()).collect(),
        }
    }
}

#[async_trait]
impl ZoneResolver for StaticZoneResolver {
    async fn find_zone(&self, fqdn: &str) -> Result<String> {
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

/// A solver pointed at the mock registrar, knowing the zone `example.com`
pub fn solver_for(server: &MockServer) -> GoDaddySolver {
    solver_with_store(server, MemorySecretStore::new())
}

/// Same as [`solver_for`], resolving secret references from `store`
pub fn solver_with_store(server: &MockServer, store: MemorySecretStore) -> GoDaddySolver {
    GoDaddySolver::new(
        SolverSettings::new("acme.example.org").with_api_base_url(server.uri()),
        Arc::new(StaticZoneResolver::new(&["example.com"])),
        Arc::new(MemorySecretStoreFactory::new(store)),
    )
    .expect("solver construction succeeds")
}

/// Solver config carrying inline credentials `K`/`S`
pub fn inline_config() -> Value {
    json!({
        "apiKeySecretRef": {"key": "K", "secret": "S"}
    })
}

/// A challenge for `_acme-challenge.example.com.` with inline credentials
pub fn challenge(key: &str) -> ChallengeRequest {
    ChallengeRequest::new("_acme-challenge.example.com.", "example.com.", key)
        .with_namespace("default")
        .with_config(inline_config())
}

/// JSON body of the record list the registrar returns
pub fn listing(records: &[(&str, &str, &str)]) -> Value {
    Value::Array(
        records
            .iter()
            .map(|(record_type, name, data)| {
                json!({"type": record_type, "name": name, "data": data, "ttl": 600})
            })
            .collect(),
    )
}

/// Log output captured from the current thread
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route this thread's events into the buffer until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let logs = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
