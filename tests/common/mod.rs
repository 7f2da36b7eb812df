//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use slicer_proxy::{HttpServer, ProxyConfig, Shutdown};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// One request as seen by the mock slicer.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    /// Raw (still percent-encoded) request path.
    pub path: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Programmed answer for one method and path.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub delay: Option<Duration>,
}

impl MockResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string().into_bytes(),
            delay: None,
        }
    }

    pub fn raw(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
            delay: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone, Default)]
struct MockState {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    responses: Arc<Mutex<HashMap<(Method, String), MockResponse>>>,
}

/// Mock slicer service recording every call it receives.
///
/// Unprogrammed routes answer 404 with a JSON error body.
pub struct MockSlicer {
    pub addr: SocketAddr,
    state: MockState,
}

impl MockSlicer {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new().fallback(mock_handler).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Program the answer for `method` on the exact (encoded) `path`.
    pub fn respond(&self, method: Method, path: &str, response: MockResponse) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert((method, path.to_string()), response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.calls.lock().unwrap().len()
    }
}

async fn mock_handler(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.calls.lock().unwrap().push(RecordedCall {
        method: method.clone(),
        path: path.clone(),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let programmed = state
        .responses
        .lock()
        .unwrap()
        .get(&(method, path))
        .cloned();

    let Some(mock) = programmed else {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(serde_json::json!({"error": "not found"})),
        )
            .into_response();
    };

    if let Some(delay) = mock.delay {
        tokio::time::sleep(delay).await;
    }

    let mut builder = Response::builder().status(mock.status);
    for (name, value) in &mock.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.body(axum::body::Body::from(mock.body)).unwrap()
}

/// Proxy configuration pointed at `backend_url`, writing into `gcodes_dir`.
///
/// The UI page points at a file that does not exist.
pub fn test_config(backend_url: &str, gcodes_dir: &Path) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.backend.base_url = backend_url.to_string();
    config.output.gcodes_path = gcodes_dir.to_string_lossy().into_owned();
    config.ui.html_path = gcodes_dir
        .join("missing_ui.html")
        .to_string_lossy()
        .into_owned();
    config
}

/// A running proxy. Dropping it stops the server.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub prefix: String,
    _shutdown: Shutdown,
}

impl TestProxy {
    pub async fn start(config: ProxyConfig) -> Self {
        let prefix = config.api.path_prefix.clone();
        let server = HttpServer::new(config).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let signal = shutdown.signal();
        tokio::spawn(async move {
            let _ = server.run(listener, signal).await;
        });

        Self {
            addr,
            prefix,
            _shutdown: shutdown,
        }
    }

    /// Absolute URL for an API path such as `/profiles/filament`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}{}", self.addr, self.prefix, path)
    }
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Parse an error reply and return `(code, message)`.
pub async fn error_body(response: reqwest::Response) -> (u16, String) {
    let body: serde_json::Value = response.json().await.unwrap();
    (
        body["error"]["code"].as_u64().unwrap() as u16,
        body["error"]["message"].as_str().unwrap().to_string(),
    )
}
