//! Handlers for short code management (`/api/v1/shorturl`).

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::short_code::{ShortCodeRequest, ShortCodeResponse};
use crate::error::AppError;
use crate::state::AppState;

fn id_not_found(id: Uuid) -> AppError {
    AppError::not_found("id not found", json!({ "id": id }))
}

/// Lists every short code, deleted entries included.
///
/// `GET /api/v1/shorturl`
pub async fn list_short_codes_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ShortCodeResponse>>, AppError> {
    let all = state.code_registry.list().await?;
    Ok(Json(all.into_iter().map(ShortCodeResponse::from).collect()))
}

/// `GET /api/v1/shorturl/{id}`
///
/// # Errors
///
/// Returns 404 Not Found for an unknown id.
pub async fn get_short_code_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ShortCodeResponse>, AppError> {
    let entry = state
        .code_registry
        .get(id)
        .await?
        .ok_or_else(|| id_not_found(id))?;

    Ok(Json(entry.into()))
}

/// Looks up the live entry holding `code`.
///
/// `GET /api/v1/shorturl/code/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if no live entry holds the code.
pub async fn get_short_code_by_code_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ShortCodeResponse>, AppError> {
    let entry = state
        .code_registry
        .resolve(&code)
        .await?
        .ok_or_else(|| AppError::not_found("code not found", json!({ "code": code })))?;

    Ok(Json(entry.into()))
}

/// Creates a short code.
///
/// `POST /api/v1/shorturl`
///
/// # Request Body
///
/// ```json
/// { "code": "abc123", "redirectUrl": "https://example.com", "note": "optional" }
/// ```
///
/// Leave `code` out to have one generated.
///
/// # Errors
///
/// Returns 400 Bad Request if `id` is set or validation fails.
/// Returns 409 Conflict if a live entry already holds the code.
pub async fn create_short_code_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortCodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.id.is_some() {
        return Err(AppError::bad_request("id must be null", json!({})));
    }
    payload.validate()?;

    let created = state.code_registry.save(payload.into_draft(None)).await?;

    info!(id = %created.id, code = %created.code, "Created short code");
    let location = format!("/api/v1/shorturl/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ShortCodeResponse::from(created)),
    ))
}

/// Replaces a short code. The path id wins over any `id` in the body.
///
/// `PUT /api/v1/shorturl/{id}`
///
/// # Errors
///
/// Returns 404 Not Found for an unknown id.
/// Returns 400 Bad Request or 409 Conflict like create.
pub async fn update_short_code_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<ShortCodeRequest>,
) -> Result<Json<ShortCodeResponse>, AppError> {
    payload.validate()?;

    let updated = state.code_registry.save(payload.into_draft(Some(id))).await?;

    info!(id = %updated.id, code = %updated.code, "Updated short code");
    Ok(Json(updated.into()))
}

/// Soft-deletes a short code and returns it.
///
/// `DELETE /api/v1/shorturl/{id}`
///
/// # Errors
///
/// Returns 404 Not Found for an unknown id.
pub async fn delete_short_code_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ShortCodeResponse>, AppError> {
    let deleted = state
        .code_registry
        .remove(id)
        .await?
        .ok_or_else(|| id_not_found(id))?;

    Ok(Json(deleted.into()))
}
