//! Bodiless backend calls (GET/DELETE) over the shared pooled client.
//!
//! Plain `http` backends go through the hyper-util pooled client; `https`
//! backends go through a reqwest client, which carries the TLS stack.
//!
//! # Responsibilities
//! - Issue the call with an explicit timeout
//! - Normalize transport failures into `BackendUnreachable`
//! - Map error statuses to `ProxyError::Backend`, status forwarded verbatim
//! - Parse the success body as JSON and hand it back untouched

use axum::body::{Body, Bytes};
use axum::http::{header, Request, StatusCode};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time;

use crate::backend::types::{is_error_status, parse_json, route_label, BackendEndpoint, SimpleMethod};
use crate::error::{error_chain, ProxyError, ProxyResult};
use crate::observability::metrics;

/// Connection pool behind a `SimpleClient`, chosen by the base URL scheme.
#[derive(Clone)]
enum Transport {
    Plain(Client<HttpConnector, Body>),
    Tls(reqwest::Client),
}

/// Client for GET/DELETE calls that carry no request body.
#[derive(Clone)]
pub struct SimpleClient {
    transport: Transport,
    endpoint: Arc<BackendEndpoint>,
    default_timeout: Duration,
}

impl SimpleClient {
    pub fn new(endpoint: Arc<BackendEndpoint>, default_timeout: Duration) -> Result<Self, reqwest::Error> {
        let transport = if endpoint.is_tls() {
            Transport::Tls(reqwest::Client::builder().no_proxy().build()?)
        } else {
            Transport::Plain(Client::builder(TokioExecutor::new()).build(HttpConnector::new()))
        };
        Ok(Self {
            transport,
            endpoint,
            default_timeout,
        })
    }

    pub async fn get(&self, segments: &[&str]) -> ProxyResult<Value> {
        self.call(SimpleMethod::Get, segments, None).await
    }

    pub async fn delete(&self, segments: &[&str]) -> ProxyResult<Value> {
        self.call(SimpleMethod::Delete, segments, None).await
    }

    /// Issue `method` against `base_url + segments`.
    ///
    /// `timeout` falls back to the client default (10s unless configured).
    pub async fn call(
        &self,
        method: SimpleMethod,
        segments: &[&str],
        timeout: Option<Duration>,
    ) -> ProxyResult<Value> {
        let url = self.endpoint.url(segments);
        let timeout = timeout.unwrap_or(self.default_timeout);
        let label = route_label(segments);
        let start_time = Instant::now();

        let request = Request::builder()
            .method(method.as_method())
            .uri(url.as_str())
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .map_err(|e| ProxyError::BackendUnreachable(format!("invalid backend URL {}: {}", url, e)))?;

        tracing::debug!(method = %method, url = %url, timeout = ?timeout, "Forwarding bodiless request");

        let (status, body) = match time::timeout(timeout, self.fetch(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(reason)) => {
                tracing::warn!(method = %method, url = %url, error = %reason, "Backend request failed");
                metrics::record_backend_call(method.as_str(), &label, None, start_time);
                return Err(ProxyError::BackendUnreachable(reason));
            }
            Err(_) => {
                tracing::warn!(method = %method, url = %url, "Backend request timed out");
                metrics::record_backend_call(method.as_str(), &label, None, start_time);
                return Err(ProxyError::BackendUnreachable(format!(
                    "request to {} timed out after {}s",
                    url,
                    timeout.as_secs_f32()
                )));
            }
        };

        metrics::record_backend_call(method.as_str(), &label, Some(status), start_time);

        if is_error_status(status) {
            return Err(ProxyError::Backend {
                status,
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        parse_json(&body)
    }

    /// Send the request and collect the whole response body.
    async fn fetch(&self, request: Request<Body>) -> Result<(StatusCode, Bytes), String> {
        match &self.transport {
            Transport::Plain(client) => {
                let response = client.request(request).await.map_err(|e| error_chain(&e))?;
                let (parts, body) = response.into_parts();
                let bytes = axum::body::to_bytes(Body::new(body), usize::MAX)
                    .await
                    .map_err(|e| error_chain(&e))?;
                Ok((parts.status, bytes))
            }
            Transport::Tls(client) => {
                let (parts, _) = request.into_parts();
                let response = client
                    .request(parts.method, parts.uri.to_string())
                    .headers(parts.headers)
                    .send()
                    .await
                    .map_err(|e| error_chain(&e))?;
                let status = response.status();
                let bytes = response.bytes().await.map_err(|e| error_chain(&e))?;
                Ok((status, bytes))
            }
        }
    }

    fn is_tls(&self) -> bool {
        matches!(self.transport, Transport::Tls(_))
    }
}

impl std::fmt::Debug for SimpleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleClient")
            .field("endpoint", &self.endpoint)
            .field("tls", &self.is_tls())
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}
