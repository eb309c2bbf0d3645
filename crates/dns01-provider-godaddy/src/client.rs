//! GoDaddy Domains API client
//!
//! Thin wrapper over the three endpoints the solver needs. Every call makes
//! exactly one HTTP request and maps unexpected statuses to
//! [`Error::RegistrarApi`]; retries are left to the orchestrator.
//!
//! ## API Reference
//!
//! - List records: `GET /v1/domains/{domain}/records`
//! - Replace records by type and name: `PUT /v1/domains/{domain}/records/{type}/{name}`
//! - Delete records by type and name: `DELETE /v1/domains/{domain}/records/{type}/{name}`

use dns01_core::credentials::Credentials;
use dns01_core::{Error, Result};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OTE (staging) API base URL
pub const STAGING_API_BASE: &str = "https://api.ote-godaddy.com";

/// Production API base URL
pub const PRODUCTION_API_BASE: &str = "https://api.godaddy.com";

/// Timeout for a single API request
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A DNS record as exchanged with the registrar
///
/// `type`, `name`, `data` and `ttl` are always sent. The remaining fields
/// only appear for record types that use them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record type (e.g. "TXT")
    #[serde(rename = "type")]
    pub record_type: String,

    /// Name relative to the domain
    pub name: String,

    /// Record value
    #[serde(default)]
    pub data: String,

    /// TTL in seconds
    #[serde(default)]
    pub ttl: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl DnsRecord {
    /// Create a TXT record
    pub fn txt(name: impl Into<String>, data: impl Into<String>, ttl: u32) -> Self {
        Self {
            record_type: "TXT".to_string(),
            name: name.into(),
            data: data.into(),
            ttl,
            priority: None,
            weight: None,
            port: None,
            protocol: None,
            service: None,
        }
    }

    /// Whether this is the TXT record `name` carrying `data`
    pub fn is_txt_with(&self, name: &str, data: &str) -> bool {
        self.record_type == "TXT" && self.name == name && self.data == data
    }
}

/// Build the HTTP client shared by every request a solver makes
///
/// Carries the timeout, user agent and content negotiation headers; the
/// credentials are attached per request since they may differ per call.
pub fn build_http_client(user_agent: &str) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(user_agent)
        .default_headers(headers)
        .build()
        .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))
}

/// Client bound to one base URL and one set of credentials
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the auth header.
#[derive(Clone)]
pub struct GoDaddyClient {
    http: reqwest::Client,
    base_url: String,
    auth: HeaderValue,
}

impl std::fmt::Debug for GoDaddyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoDaddyClient")
            .field("base_url", &self.base_url)
            .field("auth", &"<REDACTED>")
            .finish()
    }
}

impl GoDaddyClient {
    /// Create a client
    ///
    /// # Parameters
    ///
    /// - `http`: Shared HTTP client (see [`build_http_client`])
    /// - `base_url`: API base, e.g. [`STAGING_API_BASE`]
    /// - `credentials`: API key and secret for the `sso-key` scheme
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the credentials contain bytes that cannot appear in
    /// an HTTP header.
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        credentials: &Credentials,
    ) -> Result<Self> {
        let mut value = b"sso-key ".to_vec();
        value.extend_from_slice(credentials.api_key());
        value.push(b':');
        value.extend_from_slice(credentials.api_secret());

        let mut auth = HeaderValue::from_bytes(&value).map_err(|_| {
            Error::invalid_input("registrar credentials contain bytes not allowed in an HTTP header")
        })?;
        auth.set_sensitive(true);

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// The base URL requests go to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List every record of a domain
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /v1/domains/example.com/records
    /// Authorization: sso-key <key>:<secret>
    /// ```
    pub async fn list_records(&self, zone: &str) -> Result<Vec<DnsRecord>> {
        const OPERATION: &str = "list records";
        let url = format!("{}/v1/domains/{}/records", self.base_url, zone);

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.auth.clone())
            .send()
            .await
            .map_err(|e| transport_error(OPERATION, zone, e))?;

        let response = expect_status(response, StatusCode::OK, OPERATION, zone).await?;
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(OPERATION, zone, e))?;

        serde_json::from_str(&body).map_err(|e| {
            Error::Other(format!(
                "unable to decode records of '{}': {}; body: {}",
                zone, e, body
            ))
        })
    }

    /// Replace the TXT records at `label` with `record`
    ///
    /// The registrar replaces the whole TXT set at the name.
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /v1/domains/example.com/records/TXT/_acme-challenge
    /// [{"type":"TXT","name":"_acme-challenge","data":"...","ttl":0}]
    /// ```
    pub async fn upsert_txt_record(&self, zone: &str, label: &str, record: &DnsRecord) -> Result<()> {
        const OPERATION: &str = "upsert TXT record";
        let target = format!("{}/{}", zone, label);
        let url = format!("{}/v1/domains/{}/records/TXT/{}", self.base_url, zone, label);

        let response = self
            .http
            .put(&url)
            .header(AUTHORIZATION, self.auth.clone())
            .json(&[record])
            .send()
            .await
            .map_err(|e| transport_error(OPERATION, &target, e))?;

        expect_status(response, StatusCode::OK, OPERATION, &target).await?;
        Ok(())
    }

    /// Delete every record with the type and name of `record`
    ///
    /// # API Call
    ///
    /// ```http
    /// DELETE /v1/domains/example.com/records/TXT/_acme-challenge
    /// ```
    pub async fn delete_record(&self, zone: &str, record: &DnsRecord) -> Result<()> {
        const OPERATION: &str = "delete record";
        let target = format!("{}/{} {}", zone, record.name, record.record_type);
        let url = format!(
            "{}/v1/domains/{}/records/{}/{}",
            self.base_url, zone, record.record_type, record.name
        );

        let response = self
            .http
            .delete(&url)
            .header(AUTHORIZATION, self.auth.clone())
            .send()
            .await
            .map_err(|e| transport_error(OPERATION, &target, e))?;

        expect_status(response, StatusCode::NO_CONTENT, OPERATION, &target).await?;
        Ok(())
    }
}

/// Pass the response through if it has the expected status
async fn expect_status(
    response: reqwest::Response,
    expected: StatusCode,
    operation: &str,
    target: &str,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());

    tracing::debug!(
        operation = operation,
        resource = target,
        status = status.as_u16(),
        "Registrar rejected request"
    );
    Err(Error::registrar_api(operation, target, status.as_u16(), body))
}

fn transport_error(operation: &str, target: &str, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::http(format!(
            "{} {} timed out after {}s: {}",
            operation,
            target,
            HTTP_TIMEOUT.as_secs(),
            e
        ))
    } else {
        Error::http(format!("{} {} failed: {}", operation, target, e))
    }
}
