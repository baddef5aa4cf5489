//! Handler for short code redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its destination.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Public; no API key required. Lookups go through the code registry's cache,
/// so unknown codes are cached as misses too.
///
/// # Errors
///
/// Returns 400 Bad Request if the code is blank.
/// Returns 404 Not Found if no live entry holds the code.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    debug!(%code, "Processing code");

    if code.trim().is_empty() {
        return Err(AppError::bad_request("code is empty", json!({})));
    }

    let entry = state
        .code_registry
        .resolve(&code)
        .await?
        .ok_or_else(|| AppError::not_found("code not found", json!({ "code": code })))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, entry.destination)]).into_response())
}
