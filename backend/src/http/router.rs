//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (body limit, body timeout,
//! CORS, compression, tracing), and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::RequestBodyTimeoutLayer,
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive, the legacy client posts from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/databasevaluesbody", post(handlers::composition_values))
        .route("/validation/body", post(handlers::validate_body))
        .route("/tablebody", post(handlers::table_body))
        .route("/inspection/body", post(handlers::inspect_body))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(RequestBodyTimeoutLayer::new(state.body_timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
