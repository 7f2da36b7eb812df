//! Request handling.
//!
//! # Responsibilities
//! - Read the raw inbound payload and its declared content type (`Payload`)
//! - Attach a request ID (`x-request-id`) and log it on the request span
//!
//! # Design Decisions
//! - The payload is buffered whole; there are no partial-body semantics
//! - Handlers never touch the axum request directly: `Payload` is the
//!   only body/header contract they rely on

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
};
use tracing::Span;

use crate::error::{error_chain, ProxyError};
use crate::http::server::AppState;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Content type assumed when the client did not declare a readable one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Raw inbound payload plus its declared content type.
#[derive(Debug, Clone)]
pub struct Payload {
    pub bytes: Bytes,
    pub content_type: String,
}

impl Payload {
    /// True when the declared media type is JSON (`application/json` or `*+json`).
    pub fn is_json(&self) -> bool {
        is_json_content_type(&self.content_type)
    }
}

impl FromRequest<AppState> for Payload {
    type Rejection = ProxyError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = content_type_of(req.headers());
        let bytes = axum::body::to_bytes(req.into_body(), state.max_body_size)
            .await
            .map_err(|e| ProxyError::RequestBody(error_chain(&e)))?;
        Ok(Self {
            bytes,
            content_type,
        })
    }
}

/// Declared content type, or `DEFAULT_CONTENT_TYPE` if absent or not ASCII.
pub fn content_type_of(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Span for `TraceLayer`, tagged with the request ID set by `SetRequestIdLayer`.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_content_type_default() {
        let headers = HeaderMap::new();
        assert_eq!(content_type_of(&headers), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_content_type_unreadable_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_bytes(b"multipart/\xff").unwrap(),
        );
        assert_eq!(content_type_of(&headers), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_content_type_passthrough() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=abc123"),
        );
        assert_eq!(content_type_of(&headers), "multipart/form-data; boundary=abc123");
    }

    #[test]
    fn test_json_detection() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("Application/JSON; charset=utf-8"));
        assert!(is_json_content_type("application/merge-patch+json"));
        assert!(!is_json_content_type("multipart/form-data; boundary=x"));
        assert!(!is_json_content_type("application/octet-stream"));
        assert!(!is_json_content_type("text/json-ish"));
    }
}
