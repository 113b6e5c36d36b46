//! API error taxonomy.
//!
//! Every error renders as `{"detail": <message>}` with a fixed message per
//! context. Internal causes are logged, never leaked.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Login with an unknown user or a wrong password; the two cases are
    /// indistinguishable on the wire.
    BadCredentials,
    /// Missing, malformed, or expired bearer token, or a subject that no
    /// longer exists.
    Unauthorized,
    /// Authenticated but denied by policy.
    Forbidden(&'static str),
    NotFound(&'static str),
    /// Duplicate unique key.
    Conflict(&'static str),
    /// Storage or other unexpected failure.
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadCredentials => (StatusCode::BAD_REQUEST, "Incorrect user or password"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Could not validate credentials"),
            ApiError::Forbidden(detail) => (StatusCode::FORBIDDEN, detail),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::Conflict(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
