//! Profile collection and item endpoints.
//!
//! The category is validated before any backend call is made. Uploads and
//! replacements forward the inbound body byte-for-byte with its original
//! content type; the UI builds the multipart form.

use axum::extract::{Path, State};
use axum::http::Method;

use crate::api::category::ProfileCategory;
use crate::backend::BackendResponse;
use crate::error::{ProxyError, ProxyResult};
use crate::http::{AppState, Payload, Reply};

/// `GET /profiles/{category}`
pub async fn list_profiles(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ProxyResult<Reply> {
    let category: ProfileCategory = category.parse()?;
    state
        .simple
        .get(&["api", "profiles", category.as_str()])
        .await
        .map(Reply::Shaped)
}

/// `POST /profiles/{category}`: upload a new profile (multipart form).
pub async fn upload_profile(
    State(state): State<AppState>,
    Path(category): Path<String>,
    payload: Payload,
) -> ProxyResult<Reply> {
    let category: ProfileCategory = category.parse()?;

    let response = state
        .forward
        .send(
            Method::POST,
            &["api", "profiles", category.as_str()],
            payload.bytes,
            &payload.content_type,
            state.timeouts.profile,
        )
        .await?;

    if response.is_error() {
        return Err(ProxyError::ProfileUpload {
            status: response.status,
            message: response.text(),
        });
    }

    tracing::info!(category = %category, "Profile uploaded");
    response.json().map(Reply::Shaped)
}

/// `GET /profiles/{category}/{name}`
pub async fn get_profile(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
) -> ProxyResult<Reply> {
    let category: ProfileCategory = category.parse()?;
    state
        .simple
        .get(&["api", "profiles", category.as_str(), &name])
        .await
        .map(Reply::Shaped)
}

/// `DELETE /profiles/{category}/{name}`
pub async fn delete_profile(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
) -> ProxyResult<Reply> {
    let category: ProfileCategory = category.parse()?;
    let result = state
        .simple
        .delete(&["api", "profiles", category.as_str(), &name])
        .await?;

    tracing::info!(category = %category, name = %name, "Profile deleted");
    Ok(Reply::Shaped(result))
}

/// `POST /profiles/{category}/{name}`
///
/// A JSON body (`{"new_name": ...}`) is a rename and goes out as PATCH; any
/// other body replaces the profile file and goes out as PUT.
pub async fn update_profile(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
    payload: Payload,
) -> ProxyResult<Reply> {
    let category: ProfileCategory = category.parse()?;
    let (method, timeout) = if payload.is_json() {
        (Method::PATCH, state.timeouts.simple)
    } else {
        (Method::PUT, state.timeouts.profile)
    };

    let response = state
        .forward
        .send(
            method.clone(),
            &["api", "profiles", category.as_str(), &name],
            payload.bytes,
            &payload.content_type,
            timeout,
        )
        .await?;

    let result = operation_result(response)?;
    tracing::info!(category = %category, name = %name, method = %method, "Profile updated");
    Ok(Reply::Shaped(result))
}

fn operation_result(response: BackendResponse) -> ProxyResult<serde_json::Value> {
    if response.is_error() {
        return Err(ProxyError::ProfileOperation {
            status: response.status,
            message: response.text(),
        });
    }
    response.json()
}
