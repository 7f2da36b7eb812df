//! Static UI page.

use axum::extract::State;
use std::io;

use crate::error::{ProxyError, ProxyResult};
use crate::http::{AppState, Reply};

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// `GET /ui`: the page is re-read on every request so edits show up live.
pub async fn serve_ui(State(state): State<AppState>) -> ProxyResult<Reply> {
    let path = state.ui_page.as_deref().ok_or_else(|| {
        ProxyError::UiRead(io::Error::new(io::ErrorKind::NotFound, "UI page is not configured"))
    })?;

    let html = tokio::fs::read_to_string(path)
        .await
        .map_err(ProxyError::UiRead)?;

    Ok(Reply::Raw {
        content_type: HTML_CONTENT_TYPE,
        body: html,
    })
}
