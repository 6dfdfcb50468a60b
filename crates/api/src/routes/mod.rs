//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use invoicer_shared::AppError;
use serde_json::json;
use tracing::error;

use crate::AppState;

pub mod health;
pub mod invoices;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(invoices::routes())
}

/// Renders an error as `{ "error", "message" }` with its HTTP status.
///
/// Server-side failures are logged with their full detail; the client only
/// sees the public message.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %err, "Request failed");
    }

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.public_message()
        })),
    )
        .into_response()
}

/// Shorthand for a 400 `validation_error` response.
pub(crate) fn bad_request(message: impl Into<String>) -> Response {
    error_response(&AppError::Validation(message.into()))
}
