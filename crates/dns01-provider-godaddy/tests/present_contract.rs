//! Contract Test: Present
//!
//! This test verifies what Present sends to the registrar.
//!
//! Constraints verified:
//! - Exactly one PUT to /v1/domains/{zone}/records/TXT/{label}
//! - The body is a one-element array with type, name, data and ttl
//! - Presenting twice sends identical requests
//! - Registrar rejections surface with status and body, without retries
//! - Failures before the HTTP call (zone, credentials) send nothing

mod common;

use common::*;
use dns01_core::challenge::ChallengeRequest;
use dns01_core::config::DEFAULT_USER_AGENT;
use dns01_core::error::Error;
use dns01_core::secrets::MemorySecretStore;
use dns01_core::traits::Solver;
use dns01_core::SecretStoreConfig;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TXT_PATH: &str = "/v1/domains/example.com/records/TXT/_acme-challenge";

#[tokio::test]
async fn present_puts_single_txt_record() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(TXT_PATH))
        .and(header("Authorization", "sso-key K:S"))
        .and(header("Accept", "application/json"))
        .and(header("Content-Type", "application/json"))
        .and(header("User-Agent", DEFAULT_USER_AGENT))
        .and(body_json(json!([
            {"type": "TXT", "name": "_acme-challenge", "data": "abc123", "ttl": 0}
        ])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let solver = solver_for(&server);
    solver
        .present(&challenge("abc123"))
        .await
        .expect("present succeeds");
}

#[tokio::test]
async fn present_twice_sends_identical_requests() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(TXT_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let solver = solver_for(&server);
    let request = challenge("abc123");
    solver.present(&request).await.expect("first present");
    solver.present(&request).await.expect("second present");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url.path(), requests[1].url.path());
    assert_eq!(requests[0].body, requests[1].body);
}

#[tokio::test]
async fn present_uses_configured_ttl_and_subdomain_label() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/domains/example.com/records/TXT/_acme-challenge.www"))
        .and(body_json(json!([
            {"type": "TXT", "name": "_acme-challenge.www", "data": "token", "ttl": 600}
        ])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let request = ChallengeRequest::new("_acme-challenge.www.example.com.", "example.com.", "token")
        .with_config(json!({
            "apiKeySecretRef": {"key": "K", "secret": "S"},
            "ttl": 600
        }));

    solver_for(&server)
        .present(&request)
        .await
        .expect("present succeeds");
}

#[tokio::test]
async fn unauthorized_upsert_reports_status_and_body() {
    let server = MockServer::start().await;
    let body = r#"{"code":"UNABLE_TO_AUTHENTICATE","message":"Unable to authenticate"}"#;

    Mock::given(method("PUT"))
        .and(path(TXT_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let err = solver_for(&server)
        .present(&challenge("abc123"))
        .await
        .expect_err("present fails");

    assert!(!err.is_transient());
    match err {
        Error::RegistrarApi {
            status,
            body: received,
            ..
        } => {
            assert_eq!(status, 401);
            assert_eq!(received, body);
        }
        other => panic!("expected RegistrarApi error, got {:?}", other),
    }
}

#[tokio::test]
async fn server_error_is_transient_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(TXT_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let err = solver_for(&server)
        .present(&challenge("abc123"))
        .await
        .expect_err("present fails");

    assert!(err.is_transient());
}

#[tokio::test]
async fn secret_reference_credentials_reach_the_registrar() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(TXT_PATH))
        .and(header("Authorization", "sso-key K:S"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemorySecretStore::new();
    store
        .insert(
            "cert-manager",
            "godaddy-creds",
            [("api-key", "K"), ("api-secret", "S")],
        )
        .await;

    let solver = solver_with_store(&server, store);
    solver
        .initialize(&SecretStoreConfig::Memory)
        .await
        .expect("initialize succeeds");

    let request = ChallengeRequest::new("_acme-challenge.example.com.", "example.com.", "abc123")
        .with_namespace("cert-manager")
        .with_config(json!({
            "apiKeySecretRef": {"name": "godaddy-creds", "key": "api-key", "secret": "api-secret"}
        }));

    solver.present(&request).await.expect("present succeeds");
}

#[tokio::test]
async fn secret_reference_without_initialize_sends_nothing() {
    let server = MockServer::start().await;

    let request = ChallengeRequest::new("_acme-challenge.example.com.", "example.com.", "abc123")
        .with_config(json!({
            "apiKeySecretRef": {"name": "godaddy-creds", "key": "api-key", "secret": "api-secret"}
        }));

    let result = solver_for(&server).present(&request).await;

    assert!(matches!(result, Err(Error::SecretStoreNotInitialized)));
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn unknown_zone_sends_nothing() {
    let server = MockServer::start().await;

    let request = ChallengeRequest::new("_acme-challenge.example.org.", "example.org.", "abc123")
        .with_config(inline_config());

    let result = solver_for(&server).present(&request).await;

    assert!(matches!(result, Err(Error::ZoneNotFound { .. })));
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}
