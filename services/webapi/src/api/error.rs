//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every endpoint, extractor
//! and middleware returns the same `{ code, message, requestId? }` shape.
//!
//! # Key invariants and assumptions
//! - Error responses carry a stable `code` and a human-readable `message`.
//! - Status codes align with the error category.
//!
//! # Security considerations
//! - Internal errors log details server-side but return generic messages.
//! - Authorization denials never name the permission that was missing.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers and extractors.
///
/// # Invariants
/// - `status` must match the semantics of `body.code`.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use webapi::api::error::ApiError;
/// use webapi::api::types::ErrorResponse;
///
/// let err = ApiError {
///     status: StatusCode::NOT_FOUND,
///     body: ErrorResponse {
///         code: "not_found".to_string(),
///         message: "missing".to_string(),
///         request_id: None,
///     },
/// };
/// assert_eq!(err.status, StatusCode::NOT_FOUND);
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

/// Build a 404 Not Found error.
pub fn api_not_found(message: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// Build a 500 Internal Server Error from a store error.
///
/// Logs the store error and returns the generic `message` to the client.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "user store error");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// Build a 500 Internal Server Error without a store error.
pub fn api_internal_message(message: &str) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// Build a 401 Unauthorized error.
pub fn api_unauthorized(message: &str) -> ApiError {
    // Authentication failed or missing.
    api_error(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

/// Build a 403 Forbidden error.
pub fn api_forbidden(message: &str) -> ApiError {
    // Authorization failed despite authentication.
    api_error(StatusCode::FORBIDDEN, "forbidden", message)
}

/// Build a 400 Bad Request validation error.
pub fn api_validation_error(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

/// Translate a store failure into a client-facing error.
///
/// `NotFound` maps to 404, `UnknownRole` to 400 and anything else to a logged 500.
pub fn api_store_error(message: &str, err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(what) => api_not_found(&format!("{what} not found")),
        StoreError::UnknownRole(role) => api_validation_error(&format!("unknown role: {role}")),
        other => api_internal(message, &other),
    }
}
