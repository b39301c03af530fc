//! HTTP API for the query gateway and the generation engine

pub mod engine_handlers;
pub mod handlers;
pub mod routes;

pub use routes::{create_engine_router, create_router};
