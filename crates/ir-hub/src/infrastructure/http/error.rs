//! API error types and their HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::infrastructure::serial::{ConnectError, EnumerationError, SendError};

/// Errors surfaced to API callers.
///
/// Device-side failures map to 502 (the daemon is fine, the device is not);
/// a send without a connected transmitter is a caller-state conflict, 409.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("port enumeration failed: {0}")]
    Enumeration(#[from] EnumerationError),

    #[error("connect failed: {0}")]
    Connect(#[from] ConnectError),

    #[error("send failed: {0}")]
    Send(#[from] SendError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Enumeration(_) => (StatusCode::BAD_GATEWAY, "enumeration_error"),
            ApiError::Connect(_) => (StatusCode::BAD_GATEWAY, "connect_error"),
            ApiError::Send(SendError::NotConnected) => (StatusCode::CONFLICT, "not_connected"),
            ApiError::Send(SendError::WriteFailed(_)) => (StatusCode::BAD_GATEWAY, "write_failed"),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
