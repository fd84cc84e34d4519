//! HTTP contract tests for the API boundary
//!
//! Drives the router directly with tower's `oneshot` (no socket) and checks
//! the exact response shapes the boundary promises: 201/400/500 for
//! ingestion, 200/500 for the summary.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use common::{create_test_store, seed_store, FailingStore};
use fabula_core::{
    api::{ApiServer, ApiServerConfig},
    AggregationService, FeedbackStore, IngestionService, Polarity,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Router over a fresh file-backed store; the TempDir guard keeps the
/// database alive for the test body
async fn test_router() -> (Router, Arc<dyn FeedbackStore>, tempfile::TempDir) {
    let (store, dir) = create_test_store().await;
    let store: Arc<dyn FeedbackStore> = store;
    (router_over(store.clone()), store, dir)
}

fn router_over(store: Arc<dyn FeedbackStore>) -> Router {
    let server = ApiServer::new(
        ApiServerConfig::default(),
        Arc::new(IngestionService::new(store.clone())),
        Arc::new(AggregationService::new(store)),
        None,
    );
    server.router()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_submit_feedback_created() {
    let (router, store, _dir) = test_router().await;

    let response = router
        .oneshot(post_json(
            "/api/feedback",
            json!({"textId": "12345", "feedback": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Feedback submitted successfully."})
    );

    let summary = store.count_by_polarity().await.unwrap();
    assert_eq!(summary.positive, 1);
}

#[tokio::test]
async fn test_submit_feedback_invalid_value() {
    let (router, store, _dir) = test_router().await;

    let response = router
        .oneshot(post_json(
            "/api/feedback",
            json!({"textId": "12345", "feedback": 2}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Invalid feedback value."})
    );

    // Nothing persisted
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_feedback_empty_text_id() {
    let (router, store, _dir) = test_router().await;

    let response = router
        .oneshot(post_json(
            "/api/feedback",
            json!({"textId": "", "feedback": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_feedback_uses_auth_header() {
    let (router, store, _dir) = test_router().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/feedback")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-user-id", "user-42")
        .body(Body::from(
            json!({"textId": "12345", "feedback": -1}).to_string(),
        ))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let events = store.list_all().await.unwrap();
    assert_eq!(events[0].user_id.as_deref(), Some("user-42"));
}

#[tokio::test]
async fn test_submit_feedback_persistence_failure_is_server_error() {
    let router = router_over(Arc::new(FailingStore));

    let response = router
        .oneshot(post_json(
            "/api/feedback",
            json!({"textId": "12345", "feedback": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({"message": "Server error."}));
}

#[tokio::test]
async fn test_feedback_summary_buckets() {
    let (router, store, _dir) = test_router().await;
    seed_store(
        store.as_ref(),
        &[Polarity::Up, Polarity::Up, Polarity::Down],
    )
    .await;

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/metrics/feedback-summary")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([
            {"_id": 1, "count": 2},
            {"_id": -1, "count": 1},
        ])
    );
}

#[tokio::test]
async fn test_feedback_summary_empty_store() {
    let (router, _store, _dir) = test_router().await;

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/metrics/feedback-summary")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_feedback_summary_store_failure_is_server_error() {
    let router = router_over(Arc::new(FailingStore));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/metrics/feedback-summary")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({"message": "Server error."}));
}

#[tokio::test]
async fn test_story_empty_prompt_is_bad_request() {
    let (router, _store, _dir) = test_router().await;

    let response = router
        .oneshot(post_json("/api/story", json!({"prompt": "  "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Prompt must not be empty."})
    );
}

#[tokio::test]
async fn test_story_unconfigured_is_server_error() {
    // No API key configured in tests, so the story service is absent
    let (router, _store, _dir) = test_router().await;

    let response = router
        .oneshot(post_json("/api/story", json!({"prompt": "a quiet town"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({"message": "Server error."}));
}

#[tokio::test]
async fn test_health() {
    let (router, _store, _dir) = test_router().await;

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}
