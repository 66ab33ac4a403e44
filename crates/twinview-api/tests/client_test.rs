#![allow(clippy::unwrap_used)]
// Integration tests for `ITwinClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use twinview_api::{Error, ITwinClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ITwinClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let token = SecretString::from("test-token".to_string());
    let client = ITwinClient::with_base_url(&token, &TransportConfig::default(), base_url).unwrap();
    (server, client)
}

// ── iModel tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_imodel_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/imodels/model-1"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/vnd.bentley.itwin-platform.v1+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "iModel": {
                "id": "model-1",
                "displayName": "Bridge Retrofit",
                "description": "North span",
                "state": "initialized",
                "iTwinId": "tenantA",
                "createdDateTime": "2024-03-01T08:00:00Z",
                "extent": null
            }
        })))
        .mount(&server)
        .await;

    let imodel = client.get_imodel("model-1").await.unwrap();

    assert_eq!(imodel.id, "model-1");
    assert_eq!(imodel.display_name, "Bridge Retrofit");
    assert_eq!(imodel.description.as_deref(), Some("North span"));
    assert_eq!(imodel.itwin_id.as_deref(), Some("tenantA"));
    assert!(imodel.created_date_time.is_some());
}

#[tokio::test]
async fn test_get_imodel_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/imodels/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": "iModelNotFound", "message": "Requested iModel is not available." }
        })))
        .mount(&server)
        .await;

    let err = client.get_imodel("missing").await.unwrap_err();

    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
    assert_eq!(err.api_error_code(), Some("iModelNotFound"));
}

// ── Named version tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_get_named_version_resolves_changeset() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/imodels/model-1/namedversions/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "namedVersion": {
                "id": "v1",
                "displayName": "Milestone 1",
                "changesetId": "cs1",
                "changesetIndex": 12
            }
        })))
        .mount(&server)
        .await;

    let version = client.get_named_version("model-1", "v1").await.unwrap();

    assert_eq!(version.changeset_id.as_deref(), Some("cs1"));
    assert_eq!(version.changeset_index, Some(12));
}

#[tokio::test]
async fn test_baseline_named_version_has_no_changeset() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/imodels/model-1/namedversions/base"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "namedVersion": { "id": "base", "changesetId": null }
        })))
        .mount(&server)
        .await;

    let version = client.get_named_version("model-1", "base").await.unwrap();

    assert_eq!(version.changeset_id, None);
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_expired_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "code": "HeaderNotFound", "message": "Header Authorization was not found in the request." }
        })))
        .mount(&server)
        .await;

    let err = client.get_imodel("model-1").await.unwrap_err();
    assert!(err.is_auth_expired());

    match err {
        Error::Unauthorized { message } => {
            assert!(message.contains("Authorization"), "got: {message}");
        }
        other => panic!("expected Unauthorized, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limited_reads_retry_after() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let err = client.get_imodel("model-1").await.unwrap_err();

    assert!(matches!(err, Error::RateLimited { retry_after_secs: 7 }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_unstructured_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client.get_named_version("model-1", "v1").await.unwrap_err();

    match err {
        Error::Api {
            status,
            ref message,
            code: None,
        } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/imodels/model-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"unexpected\": true}"))
        .mount(&server)
        .await;

    let err = client.get_imodel("model-1").await.unwrap_err();

    assert!(
        matches!(err, Error::Deserialization { ref body, .. } if body.contains("unexpected")),
        "expected Deserialization error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_slow_response_reports_configured_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/imodels/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_secs(5))
                .set_body_json(json!({ "iModel": { "id": "slow", "displayName": "Slow" } })),
        )
        .mount(&server)
        .await;

    let transport = TransportConfig::default().with_timeout(std::time::Duration::from_secs(1));
    let token = SecretString::from("test-token".to_string());
    let client =
        ITwinClient::with_base_url(&token, &transport, Url::parse(&server.uri()).unwrap()).unwrap();

    let err = client.get_imodel("slow").await.unwrap_err();

    assert!(
        matches!(err, Error::Timeout { timeout_secs: 1 }),
        "expected Timeout, got: {err:?}"
    );
    assert!(err.is_transient());
}
