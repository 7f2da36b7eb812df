//! Backend request/response types.

use axum::body::Bytes;
use axum::http::{header::AsHeaderName, HeaderMap, Method, StatusCode};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::config::BackendConfig;
use crate::error::{ProxyError, ProxyResult};

/// Base address of the slicer service, used to build outbound URLs.
#[derive(Debug, Clone)]
pub struct BackendEndpoint {
    base: Url,
}

impl BackendEndpoint {
    /// Parse the configured base URL. Trailing slashes are ignored.
    pub fn parse(base_url: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base_url.trim_end_matches('/'))?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self { base })
    }

    /// True for `https` backends.
    pub fn is_tls(&self) -> bool {
        self.base.scheme() == "https"
    }

    /// Append path segments to the base URL.
    ///
    /// Each segment is percent-encoded on its own, so a profile name such as
    /// `My PLA/0.4` stays a single segment.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Per-call timeouts, by kind of backend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallTimeouts {
    /// Bodiless reads/deletes and profile renames.
    pub simple: Duration,
    /// Profile uploads and replacements.
    pub profile: Duration,
    /// Slicing.
    pub slice: Duration,
}

impl CallTimeouts {
    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            simple: config.simple_timeout(),
            profile: config.profile_timeout(),
            slice: config.request_timeout(),
        }
    }
}

/// Verbs allowed on bodiless backend calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleMethod {
    Get,
    Delete,
}

impl SimpleMethod {
    pub fn as_method(self) -> Method {
        match self {
            SimpleMethod::Get => Method::GET,
            SimpleMethod::Delete => Method::DELETE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SimpleMethod::Get => "GET",
            SimpleMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for SimpleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw answer from a with-body call, handed back uninterpreted.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl BackendResponse {
    /// True for any status the UI should see as a failure (>= 400).
    pub fn is_error(&self) -> bool {
        is_error_status(self.status)
    }

    /// Header value as text, if present and visible ASCII.
    pub fn header<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Header value decoded as UTF-8, invalid sequences replaced.
    ///
    /// Unlike `header`, values carrying non-ASCII bytes (such as a UTF-8
    /// `filename="teil_ü.gcode"`) are kept.
    pub fn header_lossy<K: AsHeaderName>(&self, name: K) -> Option<Cow<'_, str>> {
        self.headers
            .get(name)
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON.
    pub fn json(&self) -> ProxyResult<Value> {
        parse_json(&self.body)
    }
}

pub(crate) fn is_error_status(status: StatusCode) -> bool {
    status.as_u16() >= 400
}

pub(crate) fn parse_json(body: &[u8]) -> ProxyResult<Value> {
    serde_json::from_slice(body).map_err(|e| ProxyError::InvalidBackendResponse(e.to_string()))
}

/// Low-cardinality metrics label for an outbound path ("/api/profiles").
pub(crate) fn route_label(segments: &[&str]) -> String {
    let mut label = String::new();
    for segment in segments.iter().take(2) {
        label.push('/');
        label.push_str(segment);
    }
    label
}
