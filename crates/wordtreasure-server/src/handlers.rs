//! HTTP request handlers for the similarity service.
//!
//! Implements the scoring endpoint plus health and config views using axum.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use wordtreasure_domain::WordPair;
use wordtreasure_engine::{EngineError, SimilarityEngine};

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The similarity engine, shared by all requests
    pub engine: Arc<SimilarityEngine>,
    /// Server settings surfaced through /api/config
    pub settings: Arc<ServerConfig>,
}

/// Scoring request
#[derive(Debug, Deserialize)]
pub struct SimilarityRequest {
    /// The word the player typed
    pub user_input: String,
    /// The answer word
    pub answer: String,
}

/// Per-signal breakdown in the response
#[derive(Debug, Serialize, Deserialize)]
pub struct BreakdownResponse {
    /// Embedding similarity
    pub semantic: f32,
    /// NLI relational similarity
    pub relational: f32,
    /// Jamo distance similarity
    pub formative: f32,
    /// Antonym/opposition signal
    pub contradiction: f32,
}

/// Scoring response
#[derive(Debug, Serialize, Deserialize)]
pub struct SimilarityResponse {
    /// Final score in [0, 100]
    pub similarity_score: f32,
    /// Generated hint
    pub hint: String,
    /// Category match flag (Phase 3 collaborator)
    pub category_match: bool,
    /// Per-signal breakdown
    pub breakdown: BreakdownResponse,
    /// Server-side processing time in milliseconds
    pub processing_time_ms: f32,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Whether the engine and its providers are constructed
    pub models_loaded: bool,
}

/// Service identity response
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfoResponse {
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Running status
    pub status: String,
    /// Feature list
    pub features: Vec<String>,
}

/// Non-secret configuration view
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigResponse {
    /// Signal weights
    pub weights: WeightsResponse,
    /// Inference sidecar endpoint
    pub inference_endpoint: String,
    /// Latency target in milliseconds
    pub target_latency_ms: u64,
}

/// Weight triple in the config view
#[derive(Debug, Serialize, Deserialize)]
pub struct WeightsResponse {
    /// Semantic weight
    pub semantic: f32,
    /// Relational weight
    pub relational: f32,
    /// Formative weight
    pub formative: f32,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type mapping engine failures onto status codes.
///
/// Bad input and upstream model failures must stay distinguishable for the
/// scoring client.
#[derive(Debug)]
pub struct AppError(EngineError);

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            EngineError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            EngineError::Provider(e) => {
                error!("inference provider failure: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            EngineError::Internal(msg) => {
                error!("internal invariant violated: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

/// POST /api/similarity/calculate - Score one guess
async fn calculate_similarity(
    State(state): State<AppState>,
    Json(request): Json<SimilarityRequest>,
) -> Result<Json<SimilarityResponse>, AppError> {
    let pair = WordPair::new(request.user_input, request.answer);
    let result = state.engine.process(&pair).await?;

    Ok(Json(SimilarityResponse {
        similarity_score: result.score,
        hint: result.hint,
        category_match: result.category_match,
        breakdown: BreakdownResponse {
            semantic: result.breakdown.semantic,
            relational: result.breakdown.relational,
            formative: result.breakdown.formative,
            contradiction: result.breakdown.contradiction,
        },
        processing_time_ms: result.processing_time_ms,
    }))
}

/// GET /health - Health check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        models_loaded: true,
    })
}

/// GET / - Service identity
async fn root() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        service: "WordTreasure Similarity Service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
        features: vec![
            "Semantic Similarity (의미 유사도)".to_string(),
            "Relational Similarity (관계 유사도)".to_string(),
            "Formative Similarity (형태 유사도)".to_string(),
            "Contextual Hints (맥락적 힌트)".to_string(),
            "Relationship Analysis (관계 분석)".to_string(),
        ],
    })
}

/// GET /api/config - Non-secret runtime configuration
async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let weights = state.engine.config().weights;
    Json(ConfigResponse {
        weights: WeightsResponse {
            semantic: weights.semantic,
            relational: weights.relational,
            formative: weights.formative,
        },
        inference_endpoint: state.settings.inference_endpoint.clone(),
        target_latency_ms: state.settings.target_latency_ms,
    })
}

/// Build the axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/config", get(get_config))
        .route("/api/similarity/calculate", post(calculate_similarity))
        .with_state(state)
}
