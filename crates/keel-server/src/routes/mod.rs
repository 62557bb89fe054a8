//! HTTP route handlers.

pub mod decisions;
pub mod projects;

use crate::state::AppState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use keel_core::KeelError;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Routes mounted under `/api`.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/projects", get(projects::summary).post(projects::create))
        .route("/projects/active", get(projects::list_active))
        .route("/projects/focused", get(projects::focused))
        .route("/projects/{id}", get(projects::get))
        .route("/projects/{id}/focus", post(projects::focus))
        .route("/projects/{id}/status", put(projects::update_status))
        .route("/projects/{id}/context", get(projects::context))
        .route("/projects/{id}/decisions", post(decisions::add))
        .route("/projects/{id}/objectives", post(projects::add_objective))
        .route(
            "/projects/{id}/objectives/{objective_id}/complete",
            post(projects::complete_objective),
        )
        .route("/decision", post(decisions::add_to_focused))
        .route("/watch-dirs", get(projects::watch_dirs))
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Simple acknowledgement body.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Error type for API handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Store(KeelError),
}

impl From<KeelError> for ApiError {
    fn from(e: KeelError) -> Self {
        ApiError::Store(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Store(e) if e.is_not_found() => (StatusCode::NOT_FOUND, e.to_string()),
            ApiError::Store(e) => {
                error!(target: "keel::api", "Store operation failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
