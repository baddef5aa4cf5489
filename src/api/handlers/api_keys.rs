//! Handlers for API key management (`/api/v1/auth`).

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::api_key::{ApiKeyRequest, ApiKeyResponse};
use crate::error::AppError;
use crate::state::AppState;

fn key_not_found() -> AppError {
    AppError::not_found("id not found", json!({}))
}

/// `GET /api/v1/auth`
pub async fn list_keys_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApiKeyResponse>>, AppError> {
    let all = state.key_registry.list().await?;
    Ok(Json(all.into_iter().map(ApiKeyResponse::from).collect()))
}

/// `GET /api/v1/auth/{key}`
///
/// # Errors
///
/// Returns 404 Not Found for an unknown key.
pub async fn get_key_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    let found = state
        .key_registry
        .get(&key)
        .await?
        .ok_or_else(key_not_found)?;

    Ok(Json(found.into()))
}

/// Issues a new key. The key string is generated by the server.
///
/// `POST /api/v1/auth`
///
/// # Errors
///
/// Returns 400 Bad Request if `key` is set or the name is invalid.
pub async fn create_key_handler(
    State(state): State<AppState>,
    Json(payload): Json<ApiKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.key.is_some() {
        return Err(AppError::bad_request("key must be null", json!({})));
    }
    payload.validate()?;

    let created = state.key_registry.save(payload.into_draft(None)).await?;

    let location = format!("/api/v1/auth/{}", created.key);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiKeyResponse::from(created)),
    ))
}

/// Renames an existing key.
///
/// `PUT /api/v1/auth/{key}`
///
/// # Errors
///
/// Returns 404 Not Found for an unknown key.
pub async fn update_key_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<ApiKeyRequest>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    payload.validate()?;

    let updated = state
        .key_registry
        .rename(&key, &payload.name)
        .await?
        .ok_or_else(key_not_found)?;

    Ok(Json(updated.into()))
}

/// Revokes a key and returns it. The key stops authenticating immediately.
///
/// `DELETE /api/v1/auth/{key}`
///
/// # Errors
///
/// Returns 404 Not Found for an unknown key.
pub async fn delete_key_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    let found = state
        .key_registry
        .get(&key)
        .await?
        .ok_or_else(key_not_found)?;

    state.key_registry.remove(&key).await?;

    Ok(Json(found.into()))
}
