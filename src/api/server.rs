//! HTTP API server
//!
//! Routes are a thin shell over the service layer. Callers see exactly the
//! contracted response shapes: ingestion answers 201/400/500, the summary
//! answers 200/500, and no internal error detail ever reaches a response
//! body (it goes to the logs instead).

use super::auth::AuthUser;
use crate::services::{AggregationService, FeedbackRequest, IngestionService, StoryService};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server address
    pub addr: SocketAddr,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 5000).into(),
        }
    }
}

/// API server state shared by all handlers
#[derive(Clone)]
struct AppState {
    ingestion: Arc<IngestionService>,
    aggregation: Arc<AggregationService>,
    /// Absent when no completion-provider API key is configured
    story: Option<Arc<StoryService>>,
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Create a new API server over the given services
    pub fn new(
        config: ApiServerConfig,
        ingestion: Arc<IngestionService>,
        aggregation: Arc<AggregationService>,
        story: Option<Arc<StoryService>>,
    ) -> Self {
        Self {
            config,
            state: AppState {
                ingestion,
                aggregation,
                story,
            },
        }
    }

    /// Build the router. Public so integration tests can drive the routes
    /// without binding a socket.
    pub fn router(&self) -> Router {
        Self::build_router(self.state.clone())
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            // Feedback pipeline
            .route("/api/feedback", post(submit_feedback_handler))
            .route(
                "/api/metrics/feedback-summary",
                get(feedback_summary_handler),
            )
            // Story generation
            .route("/api/story", post(generate_story_handler))
            // Health check
            .route("/health", get(health_handler))
            // State
            .with_state(state)
            // Middleware
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until ctrl-c
    pub async fn serve(self) -> anyhow::Result<()> {
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;
        info!("API server listening on http://{}", self.config.addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown signal received");
            })
            .await?;

        Ok(())
    }
}

/// Fixed-shape response body for non-payload answers
#[derive(Debug, Serialize, Deserialize)]
struct MessageResponse {
    message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// POST /api/feedback
///
/// Body: `{textId, feedback ∈ {1,-1}, context?}`; the auth gateway supplies
/// the user ID. Answers 201 on success, 400 on a bad value, 500 otherwise.
async fn submit_feedback_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<FeedbackRequest>,
) -> Response {
    match state.ingestion.submit(request, user_id).await {
        Ok(_) => (
            StatusCode::CREATED,
            MessageResponse::new("Feedback submitted successfully."),
        )
            .into_response(),
        Err(e) if e.is_client_error() => (
            StatusCode::BAD_REQUEST,
            MessageResponse::new("Invalid feedback value."),
        )
            .into_response(),
        Err(e) => {
            error!("Error submitting feedback: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                MessageResponse::new("Server error."),
            )
                .into_response()
        }
    }
}

/// GET /api/metrics/feedback-summary
///
/// Answers the summary as an array of `{_id, count}` buckets.
async fn feedback_summary_handler(State(state): State<AppState>) -> Response {
    match state.aggregation.summarize().await {
        Ok(summary) => (StatusCode::OK, Json(summary.buckets())).into_response(),
        Err(e) => {
            error!("Error fetching feedback summary: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                MessageResponse::new("Server error."),
            )
                .into_response()
        }
    }
}

/// Story generation request body
#[derive(Debug, Deserialize)]
struct StoryRequest {
    prompt: String,
}

/// Story generation response body
#[derive(Debug, Serialize)]
struct StoryResponse {
    story: String,
}

/// POST /api/story
async fn generate_story_handler(
    State(state): State<AppState>,
    Json(request): Json<StoryRequest>,
) -> Response {
    if request.prompt.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            MessageResponse::new("Prompt must not be empty."),
        )
            .into_response();
    }

    let Some(story_service) = &state.story else {
        warn!("Story generation requested but no API key is configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            MessageResponse::new("Server error."),
        )
            .into_response();
    };

    match story_service.generate(&request.prompt).await {
        Ok(story) => (StatusCode::OK, Json(StoryResponse { story })).into_response(),
        Err(e) => {
            error!("Error generating story: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                MessageResponse::new("Server error."),
            )
                .into_response()
        }
    }
}

/// Health check handler
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::libsql::{ConnectionMode, LibsqlFeedbackStore};
    use crate::storage::FeedbackStore;

    async fn test_state() -> AppState {
        let store: Arc<dyn FeedbackStore> = Arc::new(
            LibsqlFeedbackStore::new(ConnectionMode::InMemory)
                .await
                .unwrap(),
        );
        AppState {
            ingestion: Arc::new(IngestionService::new(store.clone())),
            aggregation: Arc::new(AggregationService::new(store)),
            story: None,
        }
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = health_handler().await;
        assert_eq!(response.0.status, "ok");
        assert_eq!(response.0.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_server_creation() {
        let state = test_state().await;
        let server = ApiServer::new(
            ApiServerConfig::default(),
            state.ingestion.clone(),
            state.aggregation.clone(),
            None,
        );
        // Router builds without panicking
        let _router = server.router();
    }
}
