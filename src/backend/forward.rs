//! With-body backend calls (POST/PUT/PATCH) over a dedicated reqwest client.
//!
//! The response is returned raw: callers decide what each status means
//! (for example 409 on `/api/slice`). Only a missing response, meaning a
//! transport failure or timeout, is turned into an error here.

use axum::body::Bytes;
use axum::http::{header, Method};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backend::types::{route_label, BackendEndpoint, BackendResponse};
use crate::error::{error_chain, ProxyError, ProxyResult};
use crate::observability::metrics;

/// Client for calls that forward a payload with an explicit content type.
#[derive(Debug, Clone)]
pub struct ForwardClient {
    client: reqwest::Client,
    endpoint: Arc<BackendEndpoint>,
}

impl ForwardClient {
    pub fn new(endpoint: Arc<BackendEndpoint>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self { client, endpoint })
    }

    /// Forward `body` verbatim with `content_type`, bounded by `timeout`.
    pub async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Bytes,
        content_type: &str,
        timeout: Duration,
    ) -> ProxyResult<BackendResponse> {
        let url = self.endpoint.url(segments);
        let label = route_label(segments);
        let start_time = Instant::now();

        tracing::debug!(
            method = %method,
            url = %url,
            content_type = %content_type,
            bytes = body.len(),
            timeout = ?timeout,
            "Forwarding request body"
        );

        let result = self
            .client
            .request(method.clone(), url.clone())
            .header(header::CONTENT_TYPE, content_type)
            .timeout(timeout)
            .body(body)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                metrics::record_backend_call(method.as_str(), &label, None, start_time);
                return Err(unreachable(&e, timeout));
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                metrics::record_backend_call(method.as_str(), &label, None, start_time);
                return Err(unreachable(&e, timeout));
            }
        };

        metrics::record_backend_call(method.as_str(), &label, Some(status), start_time);
        tracing::debug!(method = %method, url = %url, status = %status, bytes = body.len(), "Backend responded");

        Ok(BackendResponse {
            status,
            headers,
            body,
        })
    }
}

fn unreachable(err: &reqwest::Error, timeout: Duration) -> ProxyError {
    let reason = error_chain(err);
    tracing::warn!(error = %reason, "Backend request failed");
    if err.is_timeout() {
        ProxyError::BackendUnreachable(format!(
            "request timed out after {}s: {}",
            timeout.as_secs_f32(),
            reason
        ))
    } else {
        ProxyError::BackendUnreachable(reason)
    }
}
