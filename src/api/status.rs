//! Health and slicing-status passthrough.

use axum::extract::State;

use crate::error::ProxyResult;
use crate::http::{AppState, Reply};

/// `GET /health` → backend `GET /api/health`.
pub async fn health(State(state): State<AppState>) -> ProxyResult<Reply> {
    state.simple.get(&["api", "health"]).await.map(Reply::Shaped)
}

/// `GET /status` → backend `GET /api/slice/status`.
pub async fn slice_status(State(state): State<AppState>) -> ProxyResult<Reply> {
    state
        .simple
        .get(&["api", "slice", "status"])
        .await
        .map(Reply::Shaped)
}
