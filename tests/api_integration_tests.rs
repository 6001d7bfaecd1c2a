//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fetch_cache::api::{create_router, AppState};
use fetch_cache::{CacheError, Config, KeyValueStore, MemoryStore, Producer, Result};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

/// Page producer that counts calls and fails for hosts named "down".
#[derive(Default)]
struct FakeWeb {
    calls: AtomicUsize,
}

#[async_trait]
impl Producer for FakeWeb {
    type Output = String;

    async fn produce(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.contains("://down") {
            return Err(CacheError::Producer(format!("{} unreachable", url)));
        }
        Ok(format!("<html>{}</html>", url))
    }
}

fn create_test_app() -> (Router, Arc<FakeWeb>) {
    let web = Arc::new(FakeWeb::default());
    let state = AppState::new(Arc::new(MemoryStore::new()), web.clone(), &Config::default());
    (create_router(state), web)
}

/// Store whose backend is gone: every operation fails.
struct DownStore;

#[async_trait]
impl KeyValueStore for DownStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(down())
    }

    async fn set(&self, _key: &str, _value: Vec<u8>) -> Result<()> {
        Err(down())
    }

    async fn set_with_expiry(&self, _key: &str, _value: Vec<u8>, _ttl_secs: u64) -> Result<()> {
        Err(down())
    }

    async fn incr(&self, _key: &str) -> Result<i64> {
        Err(down())
    }

    async fn rpush(&self, _key: &str, _value: Vec<u8>) -> Result<usize> {
        Err(down())
    }

    async fn lrange(&self, _key: &str, _start: i64, _stop: i64) -> Result<Vec<Vec<u8>>> {
        Err(down())
    }

    async fn flush_all(&self) -> Result<()> {
        Err(down())
    }
}

fn down() -> CacheError {
    CacheError::StoreUnavailable("connection refused".to_string())
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn put_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// == Page Endpoint Tests ==

#[tokio::test]
async fn test_page_endpoint_miss_then_hit() {
    let (app, web) = create_test_app();

    let (status, json) = send(&app, get("/page?url=http://example.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cache"], "miss");
    assert_eq!(json["access_count"], 1);
    assert_eq!(json["content"], "<html>http://example.com</html>");

    let (status, json) = send(&app, get("/page?url=http://example.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cache"], "hit");
    assert_eq!(json["access_count"], 2);

    assert_eq!(web.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_page_endpoint_missing_url_param() {
    let (app, _) = create_test_app();

    let response = app.oneshot(get("/page")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_page_endpoint_invalid_url() {
    let (app, web) = create_test_app();

    let (status, json) = send(&app, get("/page?url=ftp://example.com")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("http"));
    assert_eq!(web.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_page_endpoint_producer_failure() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, get("/page?url=http://down.example")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("unreachable"));

    // The failed access still counts
    let (status, json) = send(&app, get("/count?url=http://down.example")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["access_count"], 1);
}

#[tokio::test]
async fn test_page_endpoint_store_unavailable() {
    let web = Arc::new(FakeWeb::default());
    let state = AppState::new(Arc::new(DownStore), web.clone(), &Config::default());
    let app = create_router(state);

    let (status, json) = send(&app, get("/page?url=http://example.com")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].as_str().unwrap().contains("connection refused"));
    assert_eq!(web.calls.load(Ordering::SeqCst), 0);

    let (status, _) = send(&app, put_json("/store", r#"{"data":"hello"}"#)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// == Count Endpoint Tests ==

#[tokio::test]
async fn test_count_endpoint_unknown_url_is_zero() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, get("/count?url=http://never.example")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["access_count"], 0);
}

#[tokio::test]
async fn test_count_endpoint_invalid_url() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, get("/count?url=ftp://example.com")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("http"));
}

#[tokio::test]
async fn test_long_url_is_served_and_counted() {
    let (app, web) = create_test_app();
    let url = format!("http://example.com/?q={}", "a".repeat(4_100));

    let (status, json) = send(&app, get(&format!("/page?url={}", url))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cache"], "miss");

    let (status, json) = send(&app, get(&format!("/count?url={}", url))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["access_count"], 1);
    assert_eq!(web.calls.load(Ordering::SeqCst), 1);
}

// == Store / Get Endpoint Tests ==

#[tokio::test]
async fn test_store_and_get_endpoint() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, put_json("/store", r#"{"data":"hello"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let key = json["key"].as_str().unwrap().to_string();

    let (status, json) = send(&app, get(&format!("/get/{}", key))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], key.as_str());
    assert_eq!(json["value"], "hello");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, get("/get/nonexistent")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_store_endpoint_rejects_bad_body() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(put_json("/store", r#"{"data": {"nested": true}}"#))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

// == Replay Endpoint Tests ==

#[tokio::test]
async fn test_replay_endpoint_after_stores() {
    let (app, _) = create_test_app();

    let mut keys = Vec::new();
    for body in [r#"{"data":"foo"}"#, r#"{"data":42}"#] {
        let (_, json) = send(&app, put_json("/store", body)).await;
        keys.push(json["key"].as_str().unwrap().to_string());
    }

    let (status, json) = send(&app, get("/replay/DataCache.store")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["calls"], 2);
    assert_eq!(json["lines"][0], "DataCache.store was called 2 times:");
    assert_eq!(
        json["lines"][1],
        format!(r#"DataCache.store(*("foo",)) -> {}"#, keys[0]).as_str()
    );
    assert_eq!(
        json["lines"][2],
        format!("DataCache.store(*(42,)) -> {}", keys[1]).as_str()
    );
}

// == Stats / Health Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint_reflects_traffic() {
    let (app, _) = create_test_app();

    send(&app, get("/page?url=http://a.example")).await;
    send(&app, get("/page?url=http://a.example")).await;
    send(&app, get("/page?url=http://a.example")).await;
    send(&app, get("/page?url=http://b.example")).await;

    let (status, json) = send(&app, get("/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 2);
    assert_eq!(json["misses"], 2);
    assert_eq!(json["hit_rate"], 0.5);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _) = create_test_app();

    let response = app.oneshot(get("/nonexistent")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
