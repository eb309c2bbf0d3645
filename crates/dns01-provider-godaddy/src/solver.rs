// # GoDaddy Solver
//
// Reconciles the `_acme-challenge` TXT record of a challenge with the
// GoDaddy Domains API.
//
// ## Present
//
// decode config -> resolve zone -> derive label -> resolve credentials ->
// PUT the TXT record. The PUT replaces every TXT value at the name, so two
// challenges that need different values at the same name overwrite each
// other; the orchestrator's self-check catches that and retries.
//
// ## CleanUp
//
// decode config -> resolve credentials -> resolve zone -> derive label ->
// list records -> delete the TXT record whose value is the request key.
// Nothing matching is a successful no-op. The list and the delete are two
// calls and the delete is scoped to name and type, so a record written in
// between by another challenge can still be removed.
//
// ## State
//
// Nothing is cached between calls except the secret store handle set by
// `initialize` and the HTTP connection pool.

use async_trait::async_trait;
use dns01_core::challenge::ChallengeRequest;
use dns01_core::config::{SecretStoreConfig, SolverConfig, SolverSettings};
use dns01_core::credentials::resolve_credentials;
use dns01_core::traits::{SecretStore, SecretStoreFactory, Solver, ZoneResolver};
use dns01_core::zone::{extract_record_name, zone_for_request};
use dns01_core::{Error, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::client::{
    DnsRecord, GoDaddyClient, PRODUCTION_API_BASE, STAGING_API_BASE, build_http_client,
};

/// Name the solver is registered under
pub const SOLVER_NAME: &str = "godaddy";

/// DNS-01 solver for domains hosted at GoDaddy
pub struct GoDaddySolver {
    settings: SolverSettings,
    zone_resolver: Arc<dyn ZoneResolver>,
    secret_stores: Arc<dyn SecretStoreFactory>,
    secret_store: OnceCell<Arc<dyn SecretStore>>,
    http: reqwest::Client,
}

impl std::fmt::Debug for GoDaddySolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoDaddySolver")
            .field("settings", &self.settings)
            .field(
                "secret_store",
                &self.secret_store.get().map(|store| store.store_name()),
            )
            .finish_non_exhaustive()
    }
}

impl GoDaddySolver {
    /// Create a solver
    ///
    /// # Parameters
    ///
    /// - `settings`: Startup settings (group, zone lookup mode, API override)
    /// - `zone_resolver`: Used to find the authoritative zone of each FQDN
    /// - `secret_stores`: Factory `initialize` builds the secret store with
    ///
    /// # Errors
    ///
    /// `Config` if the settings do not validate.
    pub fn new(
        settings: SolverSettings,
        zone_resolver: Arc<dyn ZoneResolver>,
        secret_stores: Arc<dyn SecretStoreFactory>,
    ) -> Result<Self> {
        settings.validate()?;
        let http = build_http_client(&settings.user_agent)?;

        Ok(Self {
            settings,
            zone_resolver,
            secret_stores,
            secret_store: OnceCell::new(),
            http,
        })
    }

    /// The startup settings
    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// API base URL for a request's environment
    pub fn base_url(&self, config: &SolverConfig) -> &str {
        match self.settings.api_base_url {
            Some(ref url) => url,
            None if config.production => PRODUCTION_API_BASE,
            None => STAGING_API_BASE,
        }
    }

    /// Build an API client for one call
    async fn client_for(&self, config: &SolverConfig, namespace: &str) -> Result<GoDaddyClient> {
        let credentials = resolve_credentials(
            &config.api_key,
            namespace,
            self.secret_store.get().map(|store| store.as_ref()),
        )
        .await?;

        GoDaddyClient::new(self.http.clone(), self.base_url(config), &credentials)
    }
}

#[async_trait]
impl Solver for GoDaddySolver {
    fn name(&self) -> &'static str {
        SOLVER_NAME
    }

    async fn initialize(&self, connection: &SecretStoreConfig) -> Result<()> {
        if self.secret_store.initialized() {
            return Err(Error::config("secret store has already been initialized"));
        }

        let store = self.secret_stores.create(connection).await?;
        let store_name = store.store_name();

        self.secret_store
            .set(store)
            .map_err(|_| Error::config("secret store has already been initialized"))?;

        info!(
            "Solver '{}' initialized for group '{}' with {} secret store",
            SOLVER_NAME, self.settings.group_name, store_name
        );
        Ok(())
    }

    async fn present(&self, request: &ChallengeRequest) -> Result<()> {
        let config = SolverConfig::decode(request.config.as_ref())?;
        debug!(
            production = config.production,
            ttl = config.ttl,
            api_key = ?config.api_key,
            "Decoded solver config"
        );

        let zone = zone_for_request(
            self.zone_resolver.as_ref(),
            self.settings.zone_lookup,
            request,
        )
        .await?;
        let label = extract_record_name(&request.resolved_fqdn, &zone);

        info!(
            "Presenting TXT record {} in zone {} (fqdn: {})",
            label, zone, request.resolved_fqdn
        );

        let client = self
            .client_for(&config, &request.resource_namespace)
            .await?;
        let record = DnsRecord::txt(&label, &request.key, config.ttl);
        client.upsert_txt_record(&zone, &label, &record).await?;

        info!("TXT record {} presented in zone {}", label, zone);
        Ok(())
    }

    async fn clean_up(&self, request: &ChallengeRequest) -> Result<()> {
        let config = SolverConfig::decode(request.config.as_ref())?;
        let client = self
            .client_for(&config, &request.resource_namespace)
            .await?;

        let zone = zone_for_request(
            self.zone_resolver.as_ref(),
            self.settings.zone_lookup,
            request,
        )
        .await?;
        let label = extract_record_name(&request.resolved_fqdn, &zone);

        let records = client.list_records(&zone).await?;
        let Some(record) = records
            .into_iter()
            .find(|record| record.is_txt_with(&label, &request.key))
        else {
            warn!(
                "No TXT record {} with the challenge key in zone {}, nothing to clean up",
                label, zone
            );
            return Ok(());
        };

        info!("Cleaning up TXT record {} in zone {}", label, zone);
        client.delete_record(&zone, &record).await?;

        info!("TXT record {} removed from zone {}", label, zone);
        Ok(())
    }
}
