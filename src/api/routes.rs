//! API route definitions

use super::engine_handlers::{self, EngineState};
use super::handlers::{self, GatewayState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the query gateway router
pub fn create_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/solve", post(handlers::solve))
        // Read-only listings
        .route("/concepts", get(handlers::list_concepts))
        .route("/problems", get(handlers::list_problems))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

/// Create the generation engine router
pub fn create_engine_router(state: EngineState) -> Router {
    Router::new()
        .route("/", get(engine_handlers::root))
        .route("/health", get(engine_handlers::health))
        .route("/solve", post(engine_handlers::solve))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}
