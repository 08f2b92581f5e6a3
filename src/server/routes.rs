//! Router configuration for the web server.

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Maximum accepted upload size. There is no application-level policy on
/// file size; this cap only keeps one request from exhausting memory.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::scan_page))
        .route("/api/document", post(handlers::upload_document))
        .route("/api/scan", post(handlers::run_scan))
        .route("/api/status", get(handlers::api_status))
        .route("/healthz", get(handlers::health))
        // Static assets (CSS/JS)
        .route("/static/style.css", get(handlers::serve_css))
        .route("/static/app.js", get(handlers::serve_js))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
