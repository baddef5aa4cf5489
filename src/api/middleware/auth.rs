//! API key authentication middleware.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde_json::json;
use tracing::debug;

use crate::domain::entities::ApiKey;
use crate::error::AppError;
use crate::state::{AppState, SharedKeyRegistry};

/// Header carrying the credential.
pub const API_KEY_HEADER: &str = "API-Key";

/// Every route under this prefix requires a valid key.
pub const PROTECTED_PREFIX: &str = "/api";

/// Identity of the caller, inserted into request extensions once the key is accepted.
#[derive(Debug, Clone)]
pub struct AuthenticatedKey(pub ApiKey);

/// Checks the `API-Key` header against the key registry.
///
/// # Errors
///
/// Returns [`AppError::Unauthorized`] if the header is missing, blank or not
/// valid UTF-8. Returns [`AppError::Forbidden`] if the key is unknown.
pub async fn authenticate(
    registry: &SharedKeyRegistry,
    headers: &HeaderMap,
) -> Result<ApiKey, AppError> {
    let presented = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            AppError::unauthorized("API Key is empty", json!({ "header": API_KEY_HEADER }))
        })?;

    registry.resolve(presented).await?.ok_or_else(|| {
        debug!("Rejected unknown API key");
        AppError::forbidden("API Key is invalid", json!({ "header": API_KEY_HEADER }))
    })
}

/// Authenticates requests using the `API-Key` header.
///
/// # Header Format
///
/// ```text
/// API-Key: <key>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract the key from the `API-Key` header
/// 2. Resolve it through the key registry (cached)
/// 3. Attach [`AuthenticatedKey`] to the request extensions
/// 4. Continue to next middleware/handler
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing or blank.
/// Returns `403 Forbidden` if the key is not known.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/v1/shorturl", get(list_short_codes_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = authenticate(&st.key_registry, req.headers()).await?;

    req.extensions_mut().insert(AuthenticatedKey(key));

    Ok(next.run(req).await)
}
