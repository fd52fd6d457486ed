//! API handlers for the dashboard page.
//!
//! All handlers return `Response` via [`ApiResponse::ok`] or [`ApiErrorResponse`].

use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::dashboard::{DashboardError, DashboardService, UploadSummary};
use crate::types::DrillingRecord;
use crate::upload::UploadFile;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct DashboardState {
    pub service: DashboardService,
}

impl DashboardState {
    pub const fn new(service: DashboardService) -> Self {
        Self { service }
    }
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uploading: bool,
}

/// Reply to a successful upload: the outcome plus the records now charted.
#[derive(Debug, Serialize)]
pub struct UploadResult {
    pub summary: UploadSummary,
    pub records: Vec<DrillingRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationsQuery {
    /// Only return notifications with a greater id
    #[serde(default)]
    pub since: u64,
}

fn error_response(err: &DashboardError) -> Response {
    match err {
        DashboardError::NoFile => ApiErrorResponse::bad_request(err.to_string()),
        DashboardError::Busy => ApiErrorResponse::conflict(err.to_string()),
        DashboardError::Session(e) => ApiErrorResponse::not_found(e.to_string()),
        DashboardError::Upload { summary, .. } => ApiErrorResponse::bad_gateway(&summary.message),
    }
}

fn multipart_error(err: &MultipartError) -> Response {
    warn!(error = %err.body_text(), "Rejected multipart body");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiErrorResponse::payload_too_large(err.body_text())
    } else {
        ApiErrorResponse::bad_request(err.body_text())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /health`
pub async fn health(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uploading: state.service.is_uploading(),
    })
}

/// `GET /api/dashboard`
pub async fn get_dashboard(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(state.service.snapshot().await)
}

/// `GET /api/wells`
pub async fn list_wells(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(state.service.snapshot().await.wells)
}

/// `POST /api/wells/:id/select`
pub async fn select_well(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> Response {
    match state.service.select_well(&id).await {
        Ok(well) => ApiResponse::ok(well),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/records`
pub async fn get_records(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(state.service.records().await)
}

/// `GET /api/chat/context`
pub async fn get_chat_context(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(state.service.chat_context().await)
}

/// `GET /api/notifications?since=N`
pub async fn get_notifications(
    State(state): State<DashboardState>,
    Query(query): Query<NotificationsQuery>,
) -> Response {
    ApiResponse::ok(state.service.notifications_since(query.since))
}

/// `POST /api/dashboard/upload`
///
/// Expects `multipart/form-data` with a `file` part, forwards it to the
/// processing service and applies the normalized result.
pub async fn upload(State(state): State<DashboardState>, mut multipart: Multipart) -> Response {
    let file = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => {
                        let mut file = UploadFile::new(file_name, bytes.to_vec());
                        if let Some(ct) = content_type {
                            file = file.with_content_type(ct);
                        }
                        break file;
                    }
                    Err(e) => return multipart_error(&e),
                }
            }
            Ok(Some(field)) => {
                debug!(name = ?field.name(), "Ignoring multipart field");
            }
            Ok(None) => return error_response(&DashboardError::NoFile),
            Err(e) => return multipart_error(&e),
        }
    };

    match state.service.upload(file).await {
        Ok(summary) => ApiResponse::ok(UploadResult {
            summary,
            records: state.service.records().await,
        }),
        Err(e) => error_response(&e),
    }
}

/// Fallback for unknown `/api/*` paths.
pub async fn api_not_found() -> Response {
    ApiErrorResponse::not_found("no such endpoint")
}
