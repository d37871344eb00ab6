//! Integration Tests for backend health polling

#[path = "../test_utils/mod.rs"]
mod test_utils;

use devup::error::Error;
use devup::health::{wait_for_health, DatabaseStatus};
use devup::http::HttpClient;
use serde_json::json;
use std::time::{Duration, Instant};
use test_utils::{unused_port, MockBackend};

#[tokio::test]
async fn test_returns_first_successful_report() {
    let backend = MockBackend::builder()
        .route("GET", "/api/health", 503, json!({"status": "starting"}))
        .route("GET", "/api/health", 503, json!({"status": "starting"}))
        .route("GET", "/api/health", 200, json!({"status": "ok", "mongodb": "connected", "uptime": 3}))
        .start()
        .await;

    let report = wait_for_health(&HttpClient::new(), &backend.url("/api/health"), Duration::from_secs(10))
        .await
        .unwrap();

    assert_eq!(report.database_status(), DatabaseStatus::Connected);
    assert_eq!(report.extra.get("uptime"), Some(&json!(3)));
    assert_eq!(backend.requests_to("GET", "/api/health").len(), 3);
}

#[tokio::test]
async fn test_missing_database_field_is_reported_as_missing() {
    let backend = MockBackend::builder()
        .route("GET", "/api/health", 200, json!({"status": "ok"}))
        .start()
        .await;

    let report = wait_for_health(&HttpClient::new(), &backend.url("/api/health"), Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(report.database_status().to_string(), "missing");
}

#[tokio::test]
async fn test_any_json_body_ends_the_wait() {
    let backend = MockBackend::builder()
        .route("GET", "/api/health", 200, json!([]))
        .start()
        .await;
    let start = Instant::now();

    let report = wait_for_health(&HttpClient::new(), &backend.url("/api/health"), Duration::from_secs(5))
        .await
        .unwrap();

    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(report.database_status().to_string(), "missing");
    assert_eq!(backend.requests_to("GET", "/api/health").len(), 1);
}

#[tokio::test]
async fn test_explicit_null_database_is_shown_as_null() {
    let backend = MockBackend::builder()
        .route("GET", "/api/health", 200, json!({"status": "ok", "mongodb": null}))
        .start()
        .await;

    let report = wait_for_health(&HttpClient::new(), &backend.url("/api/health"), Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(report.database_status(), DatabaseStatus::Degraded("null".into()));
}

#[tokio::test]
async fn test_unbounded_timeout_still_polls() {
    let backend = MockBackend::builder()
        .route("GET", "/api/health", 503, json!({}))
        .route("GET", "/api/health", 200, json!({"mongodb": "connected"}))
        .start()
        .await;

    let report = wait_for_health(&HttpClient::new(), &backend.url("/api/health"), Duration::MAX)
        .await
        .unwrap();

    assert_eq!(report.database_status(), DatabaseStatus::Connected);
    assert_eq!(backend.requests_to("GET", "/api/health").len(), 2);
}

#[tokio::test]
async fn test_non_json_body_keeps_polling_until_deadline() {
    let backend = MockBackend::builder()
        .raw_route("GET", "/api/health", 200, "OK")
        .start()
        .await;

    let err = wait_for_health(&HttpClient::new(), &backend.url("/api/health"), Duration::from_millis(1500))
        .await
        .unwrap_err();

    match err {
        Error::HealthTimeout { last_error, .. } => {
            assert!(last_error.unwrap().contains("unexpected response body"));
        }
        other => panic!("expected HealthTimeout, got {:?}", other),
    }
    assert!(backend.requests_to("GET", "/api/health").len() >= 2);
}

#[tokio::test]
async fn test_refused_connections_time_out_with_last_error() {
    let url = format!("http://127.0.0.1:{}/api/health", unused_port());
    let start = Instant::now();

    let err = wait_for_health(&HttpClient::new(), &url, Duration::from_secs(1))
        .await
        .unwrap_err();

    assert!(start.elapsed() < Duration::from_secs(3));
    match err {
        Error::HealthTimeout { timeout, last_error } => {
            assert_eq!(timeout, Duration::from_secs(1));
            assert!(last_error.is_some());
        }
        other => panic!("expected HealthTimeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_hanging_backend_cannot_stretch_the_deadline() {
    // Accepts and never answers; each attempt would otherwise take 3s
    let backend = MockBackend::silent().await;
    let start = Instant::now();

    let result = wait_for_health(&HttpClient::new(), &backend.url("/api/health"), Duration::from_secs(2)).await;

    let elapsed = start.elapsed();
    assert!(matches!(result, Err(Error::HealthTimeout { .. })));
    assert!(elapsed >= Duration::from_millis(1900), "returned early: {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(2800), "overran deadline: {:?}", elapsed);
}

#[tokio::test]
async fn test_zero_timeout_fails_immediately() {
    let backend = MockBackend::healthy("connected").await;
    let start = Instant::now();

    let result = wait_for_health(&HttpClient::new(), &backend.url("/api/health"), Duration::ZERO).await;

    assert!(matches!(result, Err(Error::HealthTimeout { last_error: None, .. })));
    assert!(start.elapsed() < Duration::from_millis(500));
}
