//! Query gateway request handlers

use crate::gateway::{GatewayError, GenerationError, SolveGateway, SolveOutcome};
use crate::neo4j::models::{ConceptWithDependents, ProblemNode};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared gateway server state
pub struct GatewayServerState {
    pub gateway: SolveGateway,
}

pub type GatewayState = Arc<GatewayServerState>;

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    pub problem: String,
}

#[derive(Debug, Serialize)]
pub struct SolveResponse {
    pub solution: serde_json::Value,
    /// `knowledge_graph` or `engine`
    pub source: &'static str,
}

#[derive(Serialize)]
pub struct ConceptsResponse {
    pub concepts: Vec<ConceptWithDependents>,
}

#[derive(Serialize)]
pub struct ProblemsResponse {
    pub problems: Vec<ProblemNode>,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub neo4j: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Math Tutor API is running." }))
}

/// 200 when the graph answers, 503 otherwise
pub async fn health(State(state): State<GatewayState>) -> (StatusCode, Json<HealthResponse>) {
    let neo4j_ok = state
        .gateway
        .graph()
        .health_check()
        .await
        .unwrap_or(false);

    let (http_status, status, neo4j) = if neo4j_ok {
        (StatusCode::OK, "ok", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "disconnected")
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            neo4j: neo4j.to_string(),
        }),
    )
}

/// Stored solution for the exact problem text, or a freshly generated one
pub async fn solve(
    State(state): State<GatewayState>,
    Json(req): Json<SolveRequest>,
) -> Result<Json<SolveResponse>, AppError> {
    if req.problem.trim().is_empty() {
        return Err(AppError::BadRequest("problem must not be empty".into()));
    }

    let outcome = state.gateway.solve(&req.problem).await?;
    let source = outcome.source();
    let solution = match outcome {
        SolveOutcome::Stored(details) => serde_json::to_value(details)?,
        SolveOutcome::Generated(value) => value,
    };

    Ok(Json(SolveResponse { solution, source }))
}

pub async fn list_concepts(
    State(state): State<GatewayState>,
) -> Result<Json<ConceptsResponse>, AppError> {
    let concepts = state.gateway.concepts().await?;
    Ok(Json(ConceptsResponse { concepts }))
}

pub async fn list_problems(
    State(state): State<GatewayState>,
) -> Result<Json<ProblemsResponse>, AppError> {
    let problems = state.gateway.problems().await?;
    Ok(Json(ProblemsResponse { problems }))
}

// ============================================================================
// Errors
// ============================================================================

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    BadRequest(String),
    /// Failure reported by an upstream service, status kept as-is
    Upstream { status: u16, message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            ),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.into())
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Graph(e) => AppError::Internal(e),
            GatewayError::Generation(GenerationError::Upstream { status, body }) => {
                AppError::Upstream {
                    status,
                    message: format!("Solution engine error: {}", body),
                }
            }
            GatewayError::Generation(other) => AppError::Internal(other.into()),
        }
    }
}
