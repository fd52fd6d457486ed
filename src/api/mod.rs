//! REST API module using Axum
//!
//! Provides HTTP endpoints for the drilling dashboard:
//! - JSON API under `/api` with a consistent envelope
//! - The dashboard page served via `rust-embed` (compiled into the binary)

pub mod envelope;
pub mod handlers;
pub mod middleware;
mod routes;

pub use handlers::DashboardState;

use axum::http::{header, Method, StatusCode, Uri};
use axum::middleware as axum_mw;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use rust_embed::Embed;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Dashboard page and static assets from `dashboard/dist/`.
#[derive(Embed)]
#[folder = "dashboard/dist/"]
struct DashboardAssets;

fn asset_response(status: StatusCode, path: &str) -> Option<Response> {
    let content = DashboardAssets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some(
        (
            status,
            [(header::CONTENT_TYPE, mime.as_ref())],
            content.data.into_owned(),
        )
            .into_response(),
    )
}

/// `GET /dashboard`
async fn serve_dashboard() -> Response {
    asset_response(StatusCode::OK, "index.html")
        .unwrap_or_else(|| (StatusCode::OK, "DEEPBIT is running. Dashboard page not bundled.").into_response())
}

/// Serve a static asset, or the not-found page for anything else.
async fn serve_asset(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    if !path.is_empty() && path != "404.html" {
        if let Some(resp) = asset_response(StatusCode::OK, path) {
            return resp;
        }
    }

    asset_response(StatusCode::NOT_FOUND, "404.html")
        .unwrap_or_else(|| (StatusCode::NOT_FOUND, "Page Not Found").into_response())
}

/// Build a CORS layer that is restrictive by default (same-origin only).
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        return base;
    }

    let allowed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    tracing::info!(origins = ?origins, "CORS: allowing configured origins");
    base.allow_origin(allowed)
}

/// Create the complete application router with API and page serving.
pub fn create_app(state: DashboardState, server: &ServerConfig) -> Router {
    Router::new()
        .nest(
            "/api",
            routes::api_routes(state.clone(), server.max_upload_bytes)
                .layer(axum_mw::from_fn(middleware::no_store)),
        )
        .merge(routes::health_routes(state))
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/dashboard", get(serve_dashboard))
        .fallback(serve_asset)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&server.cors_origins))
}
