//! Slice endpoint and output persistence.

use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use serde::Serialize;

use crate::error::{ProxyError, ProxyResult};
use crate::http::{AppState, Payload, Reply};
use crate::observability::metrics::{self, SliceOutcome};
use crate::output::resolve_output_filename;

/// Response header the backend reports slicing duration in.
pub const X_SLICE_TIME_SECONDS: &str = "x-slice-time-seconds";

/// Summary returned to the UI once the G-code is on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceSummary {
    pub filename: String,
    pub size: usize,
    pub slice_time: String,
}

/// `POST /slice`: forward the model and profile selections, save the G-code.
///
/// The work runs in its own task, so a client that disconnects mid-slice
/// still gets its file written.
pub async fn slice(State(state): State<AppState>, payload: Payload) -> ProxyResult<Reply> {
    let summary = tokio::spawn(run_slice(state, payload))
        .await
        .map_err(|e| ProxyError::SliceTask(e.to_string()))??;

    let value = serde_json::to_value(summary)
        .map_err(|e| ProxyError::SliceTask(e.to_string()))?;
    Ok(Reply::Shaped(value))
}

async fn run_slice(state: AppState, payload: Payload) -> ProxyResult<SliceSummary> {
    let result = slice_and_save(&state, payload).await;
    let (outcome, bytes) = slice_outcome(&result);
    metrics::record_slice(outcome, bytes);
    result
}

/// Metrics label and written byte count for a finished slice request.
fn slice_outcome(result: &ProxyResult<SliceSummary>) -> (SliceOutcome, usize) {
    match result {
        Ok(summary) => (SliceOutcome::Written, summary.size),
        Err(ProxyError::SlicerBusy) => (SliceOutcome::Busy, 0),
        Err(_) => (SliceOutcome::Failed, 0),
    }
}

async fn slice_and_save(state: &AppState, payload: Payload) -> ProxyResult<SliceSummary> {
    let response = state
        .forward
        .send(
            Method::POST,
            &["api", "slice"],
            payload.bytes,
            &payload.content_type,
            state.timeouts.slice,
        )
        .await?;

    if response.status == StatusCode::CONFLICT {
        return Err(ProxyError::SlicerBusy);
    }
    if response.is_error() {
        return Err(ProxyError::SliceFailed {
            status: response.status,
            message: response.text(),
        });
    }

    let disposition = response.header_lossy(header::CONTENT_DISPOSITION);
    let filename = resolve_output_filename(disposition.as_deref());
    let size = response.body.len();
    state.output.write(&filename, &response.body).await?;

    let slice_time = response
        .header_lossy(X_SLICE_TIME_SECONDS)
        .map(|v| v.into_owned())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info!(
        filename = %filename,
        size,
        slice_time = %slice_time,
        dir = %state.output.root().display(),
        "Slice complete"
    );

    Ok(SliceSummary {
        filename,
        size,
        slice_time,
    })
}
