//! Shared harness for API integration tests.
//!
//! Builds the production router (same middleware stack as `main.rs`)
//! against a test database and stub external-service endpoints that refuse
//! connections, which is fine for everything that fails before reaching them.

// Each integration-test binary compiles this module separately and not all
// of them use every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use clookit_api::config::ServerConfig;
use clookit_api::router::build_app_router;
use clookit_api::state::AppState;
use clookit_identity::IdentityClient;
use clookit_inference::InferenceClient;
use clookit_storage::{ObjectStorage, StorageConfig};
use clookit_worker::{DownloadQueue, ProgressTracker};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        download_concurrency: 2,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and unreachable stub services.
pub async fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let storage = ObjectStorage::connect(&StorageConfig {
        endpoint: "http://127.0.0.1:1".to_string(),
        region: "local".to_string(),
        access_key: "test".to_string(),
        secret_key: "test".to_string(),
        bucket: "pages".to_string(),
    })
    .await;

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        identity: IdentityClient::new("http://127.0.0.1:1", "test-key"),
        storage,
        inference: InferenceClient::new("http://127.0.0.1:1", "test-token", "test-version"),
        queue: DownloadQueue::new(config.download_concurrency),
        tracker: Arc::new(ProgressTracker::default()),
        http: reqwest::Client::new(),
    };

    build_app_router(state, &config)
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response<axum::body::Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a POST request with a JSON body against the app.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
) -> Response<axum::body::Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<axum::body::Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
