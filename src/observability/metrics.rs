//! Metrics collection and exposition.
//!
//! # Metrics
//! - `slicer_proxy_backend_requests_total` (counter): backend calls by method, endpoint, status
//! - `slicer_proxy_backend_request_duration_seconds` (histogram): backend latency
//! - `slicer_proxy_slices_total` (counter): slice requests by outcome
//! - `slicer_proxy_sliced_bytes_total` (counter): G-code bytes written
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use axum::http::StatusCode;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one backend call. `status` is `None` when no response arrived.
pub fn record_backend_call(method: &str, endpoint: &str, status: Option<StatusCode>, start_time: Instant) {
    let status = status
        .map(|s| s.as_u16().to_string())
        .unwrap_or_else(|| "unreachable".to_string());

    metrics::counter!(
        "slicer_proxy_backend_requests_total",
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string(),
        "status" => status
    )
    .increment(1);

    metrics::histogram!(
        "slicer_proxy_backend_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string()
    )
    .record(start_time.elapsed().as_secs_f64());
}

/// Slice request outcome, as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceOutcome {
    Written,
    Busy,
    Failed,
}

impl SliceOutcome {
    fn as_str(self) -> &'static str {
        match self {
            SliceOutcome::Written => "written",
            SliceOutcome::Busy => "busy",
            SliceOutcome::Failed => "failed",
        }
    }
}

pub fn record_slice(outcome: SliceOutcome, bytes: usize) {
    metrics::counter!("slicer_proxy_slices_total", "outcome" => outcome.as_str()).increment(1);
    if bytes > 0 {
        metrics::counter!("slicer_proxy_sliced_bytes_total").increment(bytes as u64);
    }
}
