//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::error;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/map", get(map_document))
        .route("/status", get(status))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Host page with the auto-reloading map frame.
async fn index_page(State(state): State<AppState>) -> Result<Response, AppError> {
    let template = IndexTemplate {
        title: &state.title,
        refresh_ms: state.refresh_ms,
    };
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;

    Ok(Html(html).into_response())
}

/// The latest map document, never cached by the browser.
async fn map_document(State(state): State<AppState>) -> Response {
    let document = state.latest.get().await;
    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(document.html().to_string()),
    )
        .into_response()
}

/// Summary of the latest refresh cycle.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let document = state.latest.get().await;
    Json(StatusResponse::from_document(&document))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        error!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
