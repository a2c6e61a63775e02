use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use monconsole_client::ApiError;
use monconsole_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`ApiError`] for backend
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `monconsole_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The configuration backend failed or answered unexpectedly.
    #[error(transparent)]
    Upstream(#[from] ApiError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Upstream(err) => classify_upstream_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::MalformedRecord(msg) => {
            tracing::error!(error = %msg, "Malformed record");
            internal()
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Backend 404s pass through; every other backend failure is a 502.
///
/// Domain errors raised while decoding a backend answer keep their own
/// mapping, except malformed payloads, which are the backend's fault.
fn classify_upstream_error(err: &ApiError) -> (StatusCode, &'static str, String) {
    match err {
        ApiError::Status { status: 404, .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        ApiError::Decode(CoreError::MalformedRecord(msg)) => {
            tracing::error!(error = %msg, "Malformed backend response");
            bad_gateway()
        }
        ApiError::Decode(core) => classify_core_error(core),
        other => {
            tracing::error!(error = %other, "Backend request failed");
            bad_gateway()
        }
    }
}

fn bad_gateway() -> (StatusCode, &'static str, String) {
    (
        StatusCode::BAD_GATEWAY,
        "UPSTREAM_ERROR",
        "The configuration backend is unavailable".to_string(),
    )
}
