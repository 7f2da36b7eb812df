//! Request-handling errors and their HTTP mapping.
//!
//! Every error is raised where it is detected and travels unchanged to the
//! client; nothing here retries. The JSON shape mirrors what the UI expects:
//! `{"error": {"code": 503, "message": "..."}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::error::Error as StdError;
use thiserror::Error;

/// Errors surfaced to the UI by the route handlers.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Path parameter named an unknown profile category.
    #[error("Invalid profile type '{given}'. Must be one of: {valid}")]
    InvalidCategory { given: String, valid: String },

    /// Transport-level failure reaching the slicer (refused, DNS, timeout).
    #[error("slicer backend unreachable: {0}")]
    BackendUnreachable(String),

    /// The slicer answered a bodiless call with an error status.
    #[error("slicer backend error: {message}")]
    Backend { status: StatusCode, message: String },

    #[error("Profile upload failed: {message}")]
    ProfileUpload { status: StatusCode, message: String },

    #[error("Profile operation failed: {message}")]
    ProfileOperation { status: StatusCode, message: String },

    /// The slicer is occupied with another job; the UI may retry shortly.
    #[error("Slicer is busy")]
    SlicerBusy,

    #[error("Slice failed: {message}")]
    SliceFailed { status: StatusCode, message: String },

    /// A successful backend response whose body is not valid JSON.
    #[error("invalid response from slicer backend: {0}")]
    InvalidBackendResponse(String),

    #[error("Failed to read UI: {0}")]
    UiRead(std::io::Error),

    #[error("Failed to write GCODE file: {0}")]
    OutputWrite(std::io::Error),

    #[error("Cannot access request body: {0}")]
    RequestBody(String),

    /// The detached slice task panicked or was cancelled.
    #[error("slice task aborted: {0}")]
    SliceTask(String),
}

/// Result type for request handling.
pub type ProxyResult<T> = Result<T, ProxyError>;

impl ProxyError {
    /// HTTP status reported to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidCategory { .. } => StatusCode::BAD_REQUEST,
            ProxyError::BackendUnreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::Backend { status, .. }
            | ProxyError::ProfileUpload { status, .. }
            | ProxyError::ProfileOperation { status, .. }
            | ProxyError::SliceFailed { status, .. } => *status,
            ProxyError::SlicerBusy => StatusCode::CONFLICT,
            ProxyError::InvalidBackendResponse(_) => StatusCode::BAD_GATEWAY,
            ProxyError::UiRead(_)
            | ProxyError::OutputWrite(_)
            | ProxyError::RequestBody(_)
            | ProxyError::SliceTask(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %message, "Request rejected");
        }

        let body = json!({
            "error": {
                "code": status.as_u16(),
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}

/// Render an error together with its `source()` chain, so transport failures
/// keep the underlying reason ("tcp connect error: Connection refused").
pub fn error_chain(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = inner.source();
    }
    out
}
