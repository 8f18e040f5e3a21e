mod common;

use common::init_tracing;
use kvsync_engine::{
    list_all_keys, reconcile_records, BulkOp, CloudflareKvConfig, CloudflareKvStore, EngineError,
    KvStore,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEYS_PATH: &str = "/accounts/acct/storage/kv/namespaces/ns/keys";
const BULK_PATH: &str = "/accounts/acct/storage/kv/namespaces/ns/bulk";

// ── Config ──────────────────────────────────────────────────────

#[test]
fn config_defaults() {
    let cfg = CloudflareKvConfig::default();
    assert_eq!(cfg.api_base_url, "https://api.cloudflare.com/client/v4");
    assert_eq!(cfg.page_size, 1000);
    assert_eq!(cfg.max_batch_size, 10_000);
    assert_eq!(cfg.timeout_secs, 60);
    assert!(cfg.api_token.is_empty());
}

#[test]
fn config_debug_redacts_token() {
    let cfg = CloudflareKvConfig {
        api_token: "super-secret-token".to_string(),
        ..Default::default()
    };
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("super-secret-token"));
    assert!(debug.contains("<redacted>"));
    assert!(debug.contains("api_base_url"));
}

#[test]
fn config_serde_roundtrip() {
    let cfg = CloudflareKvConfig {
        account_id: "acct".to_string(),
        namespace_id: "ns".to_string(),
        page_size: 50,
        ..Default::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    let back: CloudflareKvConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.account_id, "acct");
    assert_eq!(back.page_size, 50);
}

#[test]
fn partial_config_fills_defaults() {
    let cfg: CloudflareKvConfig =
        serde_json::from_str(r#"{"account_id":"acct","namespace_id":"ns","api_token":"t"}"#)
            .unwrap();
    assert_eq!(cfg.page_size, 1000);
    assert_eq!(cfg.api_base_url, "https://api.cloudflare.com/client/v4");
}

#[test]
fn missing_ids_rejected() {
    let err = CloudflareKvStore::new(CloudflareKvConfig::default())
        .err()
        .unwrap();
    assert!(matches!(err, EngineError::Config(_)));
}

#[test]
fn zero_page_size_rejected() {
    let cfg = CloudflareKvConfig {
        account_id: "acct".to_string(),
        namespace_id: "ns".to_string(),
        page_size: 0,
        ..Default::default()
    };
    assert!(matches!(
        CloudflareKvStore::new(cfg),
        Err(EngineError::Config(_))
    ));
}

#[test]
fn store_reports_limits() {
    let store = CloudflareKvStore::new(CloudflareKvConfig {
        account_id: "acct".to_string(),
        namespace_id: "ns".to_string(),
        max_batch_size: 25,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(store.provider_name(), "Workers KV");
    assert_eq!(store.max_batch_size(), 25);
    assert_eq!(store.config().namespace_id, "ns");
}

// ── Wiremock-based integration tests ────────────────────────────

fn mock_store(server: &MockServer) -> CloudflareKvStore {
    CloudflareKvStore::new(CloudflareKvConfig {
        account_id: "acct".to_string(),
        namespace_id: "ns".to_string(),
        api_token: "tok".to_string(),
        api_base_url: server.uri(),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn list_walks_every_page() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(KEYS_PATH))
        .and(bearer_token("tok"))
        .and(query_param("limit", "1000"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"name": "A"}, {"name": "B"}],
            "result_info": {"cursor": "page2", "list_complete": false},
            "success": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(KEYS_PATH))
        .and(query_param("limit", "1000"))
        .and(query_param("cursor", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"name": "C", "expiration": 1700000000}],
            "result_info": {"cursor": "", "list_complete": true},
            "success": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = mock_store(&server);
    let keys = list_all_keys(&store).await.unwrap();
    assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn list_without_result_info_is_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(KEYS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"name": "ONLY"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = mock_store(&server);
    let page = store.list_keys(None).await.unwrap();
    assert_eq!(page.keys, vec!["ONLY"]);
    assert!(page.is_last());
}

#[tokio::test]
async fn list_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(KEYS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("Authentication error"))
        .mount(&server)
        .await;

    let store = mock_store(&server);
    let err = list_all_keys(&store).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("Authentication error"));
}

#[tokio::test]
async fn list_unparseable_body_is_list_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(KEYS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let store = mock_store(&server);
    let err = store.list_keys(None).await.unwrap_err();
    assert!(matches!(err, EngineError::RemoteList { status: Some(200), .. }));
}

#[tokio::test]
async fn bulk_write_sends_mixed_array() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(BULK_PATH))
        .and(bearer_token("tok"))
        .and(body_json(json!([
            {"key": "KEEP", "value": "\"ok\""},
            {"key": "EXTRA", "delete": true}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let store = mock_store(&server);
    store
        .bulk_write(&[BulkOp::put("KEEP", "\"ok\""), BulkOp::delete("EXTRA")])
        .await
        .unwrap();
}

#[tokio::test]
async fn bulk_write_error_carries_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(BULK_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("namespace locked"))
        .mount(&server)
        .await;

    let store = mock_store(&server);
    let err = store.bulk_write(&[BulkOp::delete("X")]).await.unwrap_err();

    assert!(matches!(err, EngineError::RemoteWrite { status: Some(500), .. }));
    assert!(err.to_string().contains("namespace locked"));
}

#[tokio::test]
async fn end_to_end_against_http_store() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(KEYS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"name": "DROP1"}, {"name": "EXTRA"}],
            "result_info": {"list_complete": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(BULK_PATH))
        .and(body_json(json!([
            {"key": "KEEP", "value": "\"ok\""},
            {"key": "grouped", "value": "{\"findings\":{}}"},
            {"key": "DROP1", "delete": true},
            {"key": "DROP2", "delete": true},
            {"key": "EXTRA", "delete": true}
        ])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = mock_store(&server);
    let result = reconcile_records(
        &store,
        vec![
            ("KEEP", json!("ok")),
            ("DROP1", json!("")),
            ("DROP2", json!({})),
            ("grouped", json!({"findings": {}})),
        ],
    )
    .await
    .unwrap();

    assert_eq!(result.updated, vec!["KEEP", "grouped"]);
    assert_eq!(result.deleted, vec!["DROP1", "DROP2", "EXTRA"]);
}

#[tokio::test]
async fn list_failure_over_http_sends_no_write() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(KEYS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(BULK_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = mock_store(&server);
    let result = reconcile_records(&store, [("KEEP", json!(1))]).await;
    assert!(matches!(
        result,
        Err(EngineError::RemoteList { status: Some(500), .. })
    ));
}

#[tokio::test]
async fn unreachable_server_is_list_error_without_status() {
    let store = CloudflareKvStore::new(CloudflareKvConfig {
        account_id: "acct".to_string(),
        namespace_id: "ns".to_string(),
        api_base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 2,
        ..Default::default()
    })
    .unwrap();

    let err = store.list_keys(None).await.unwrap_err();
    assert!(matches!(err, EngineError::RemoteList { status: None, .. }));
}
