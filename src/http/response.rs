//! Response shaping.
//!
//! A handler either returns a JSON value for the standard wrapping, or a
//! raw body it has written itself with its own content type. Errors go
//! through `ProxyError`'s `IntoResponse`.

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

/// Result of a route handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// JSON body, status 200.
    Shaped(Value),
    /// Body written verbatim with the given content type.
    Raw {
        content_type: &'static str,
        body: String,
    },
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Shaped(value) => Json(value).into_response(),
            Reply::Raw { content_type, body } => {
                ([(header::CONTENT_TYPE, content_type)], body).into_response()
            }
        }
    }
}
