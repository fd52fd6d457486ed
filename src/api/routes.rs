//! API route definitions
//!
//! - /api/dashboard - page snapshot
//! - /api/dashboard/upload - file upload, forwarded to the processing service
//! - /api/wells - sidebar catalog, /api/wells/:id/select to pick one
//! - /api/records - chart data
//! - /api/chat/context - chat panel props
//! - /api/notifications - toast feed

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, DashboardState};

/// Create all API routes for the dashboard
pub fn api_routes(state: DashboardState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route(
            "/dashboard/upload",
            post(handlers::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/wells", get(handlers::list_wells))
        .route("/wells/:id/select", post(handlers::select_well))
        .route("/records", get(handlers::get_records))
        .route("/chat/context", get(handlers::get_chat_context))
        .route("/notifications", get(handlers::get_notifications))
        .fallback(handlers::api_not_found)
        .with_state(state)
}

/// Health endpoint at root level
pub fn health_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .with_state(state)
}
