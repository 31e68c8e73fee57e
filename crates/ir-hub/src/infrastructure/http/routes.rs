//! API route definitions.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use super::handlers;
use super::state::AppState;

/// All API routes.
///
/// CORS is permissive: the web UI is served from a different origin during
/// development and the daemon carries no credentials.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ports", get(handlers::list_ports))
        .route("/api/status", get(handlers::status))
        .route("/api/connect", post(handlers::connect))
        .route("/api/send", post(handlers::send))
        .route("/api/events", get(handlers::events))
        .layer(CorsLayer::permissive())
}
