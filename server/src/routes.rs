//! HTTP API implementation
//!
//! Thin boundary over the clustering engine: request parsing, typed error
//! mapping, and response shaping. All clustering semantics live in
//! `chorus-engine`; nothing here touches store state directly.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;
use uuid::Uuid;

use chorus_engine::{
    application::{AssignmentEngine, AssignmentOutcome, ClusterSummary, EngineStats, SummaryService},
    domain::ClusterId,
    EngineError,
};

// Application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AssignmentEngine>,
    pub summary: Arc<SummaryService>,
    /// Model name echoed by `/api/settings` and `/health`.
    pub model_name: String,
    pub start_time: std::time::Instant,
}

/// Build the HTTP router. Takes the state by value so tests can drive the
/// router with `tower::ServiceExt::oneshot` without binding a socket.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/comment", post(submit_comment_handler))
        .route("/api/clusters", get(list_clusters_handler))
        .route("/api/cluster/{cluster_id}", get(get_cluster_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/settings", get(settings_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Engine error carried across the HTTP boundary.
pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            EngineError::EmptyText | EngineError::InvalidParameter { .. } => {
                StatusCode::BAD_REQUEST
            }
            EngineError::ClusterNotFound(_) | EngineError::CommentNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            EngineError::EmbeddingUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::DimensionMismatch { .. } | EngineError::AlreadyAssigned(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct SubmitCommentRequest {
    #[serde(default)]
    text: String,
    user_id: Option<String>,
}

// HTTP handlers
async fn submit_comment_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitCommentRequest>,
) -> Result<Json<AssignmentOutcome>, ApiError> {
    // Reject the obvious case before spending an embedding call; the engine
    // guards again after normalization.
    if request.text.trim().is_empty() {
        return Err(ApiError(EngineError::EmptyText));
    }

    let outcome = state.engine.process(&request.text, request.user_id).await?;
    Ok(Json(outcome))
}

async fn list_clusters_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let clusters = state.summary.list_clusters().await?;
    let stats = state.summary.stats().await?;

    Ok(Json(serde_json::json!({
        "clusters": clusters,
        "total_clusters": stats.total_clusters,
        "total_comments": stats.total_comments,
    })))
}

async fn get_cluster_handler(
    State(state): State<Arc<AppState>>,
    Path(cluster_id): Path<Uuid>,
) -> Result<Json<ClusterSummary>, ApiError> {
    let summary = state.summary.get_cluster(ClusterId(cluster_id)).await?;
    Ok(Json(summary))
}

async fn stats_handler(State(state): State<Arc<AppState>>) -> Result<Json<EngineStats>, ApiError> {
    let stats = state.summary.stats().await?;
    Ok(Json(stats))
}

async fn settings_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "model_name": state.model_name,
        "embedding_size": state.engine.embedding_dimension(),
        "similarity_threshold": state.engine.similarity_threshold(),
    }))
}

async fn health_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stats = state.summary.stats().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "model": state.model_name,
        "embedding_size": state.engine.embedding_dimension(),
        "total_clusters": stats.total_clusters,
        "total_comments": stats.total_comments,
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    })))
}
