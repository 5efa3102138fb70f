//! Integration tests for the bearer-token guard on protected routes.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, get, post_json};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Missing Authorization header
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn downloads_require_authentication(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let response = get(app, "/downloads").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["message"], "Missing Authorization header");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn download_creation_requires_authentication(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let response = post_json(
        app,
        "/downloads",
        json!({ "url": "https://example.com/file.pdf" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn generations_require_authentication(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let response = get(app, "/api/ai/generations").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Malformed Authorization header
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn non_bearer_scheme_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let request = Request::builder()
        .method("GET")
        .uri("/downloads")
        .header("authorization", "Token abc123")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
}

// ---------------------------------------------------------------------------
// Identity service unreachable
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unreachable_identity_service_is_a_server_error(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    // The stub identity endpoint refuses connections, so a syntactically
    // valid bearer token cannot be validated.
    let request = Request::builder()
        .method("GET")
        .uri("/downloads")
        .header("authorization", "Bearer some-token")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["error"], "identity_unavailable");
}
