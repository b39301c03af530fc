//! Generation engine request handlers

use super::handlers::AppError;
use crate::engine::SolutionEngine;
use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

/// Shared engine server state
pub struct EngineServerState {
    pub engine: SolutionEngine,
}

pub type EngineState = Arc<EngineServerState>;

#[derive(Debug, Deserialize)]
pub struct EngineSolveRequest {
    pub problem: String,
    /// Stream plain text (default) or answer with one JSON body
    #[serde(default = "default_stream")]
    pub stream: bool,
}

fn default_stream() -> bool {
    true
}

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Solution engine is running." }))
}

pub async fn health(State(state): State<EngineState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.engine.model_name(),
    }))
}

/// Step-by-step solution, streamed as `text/plain` or returned as `{"solution": ..}`
pub async fn solve(
    State(state): State<EngineState>,
    Json(req): Json<EngineSolveRequest>,
) -> Result<Response, AppError> {
    if req.problem.trim().is_empty() {
        return Err(AppError::BadRequest("problem must not be empty".into()));
    }

    if !req.stream {
        let solution = state.engine.solve(&req.problem).await.map_err(model_error)?;
        return Ok(Json(serde_json::json!({ "solution": solution })).into_response());
    }

    let stream = state
        .engine
        .solve_stream(&req.problem)
        .await
        .map_err(model_error)?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response())
}

fn model_error(err: anyhow::Error) -> AppError {
    tracing::error!("Model request failed: {:#}", err);
    AppError::Upstream {
        status: 502,
        message: format!("Model request failed: {}", err),
    }
}
