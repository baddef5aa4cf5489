//! Protected API routes, mounted under [`PROTECTED_PREFIX`](crate::api::middleware::auth::PROTECTED_PREFIX).

use crate::api::handlers::{
    create_key_handler, create_short_code_handler, delete_key_handler, delete_short_code_handler,
    get_key_handler, get_short_code_by_code_handler, get_short_code_handler, list_keys_handler,
    list_short_codes_handler, update_key_handler, update_short_code_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes. Authentication is applied by the caller.
///
/// # Endpoints
///
/// - `GET    /v1/shorturl`              - List short codes, deleted included
/// - `POST   /v1/shorturl`              - Create a short code
/// - `GET    /v1/shorturl/{id}`         - Get by id
/// - `PUT    /v1/shorturl/{id}`         - Replace code, destination and note
/// - `DELETE /v1/shorturl/{id}`         - Soft-delete
/// - `GET    /v1/shorturl/code/{code}`  - Get the live entry for a code
/// - `GET    /v1/auth`                  - List API keys
/// - `POST   /v1/auth`                  - Issue a key
/// - `GET    /v1/auth/{key}`            - Get a key
/// - `PUT    /v1/auth/{key}`            - Rename a key
/// - `DELETE /v1/auth/{key}`            - Revoke a key
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/shorturl",
            get(list_short_codes_handler).post(create_short_code_handler),
        )
        .route(
            "/v1/shorturl/{id}",
            get(get_short_code_handler)
                .put(update_short_code_handler)
                .delete(delete_short_code_handler),
        )
        .route(
            "/v1/shorturl/code/{code}",
            get(get_short_code_by_code_handler),
        )
        .route("/v1/auth", get(list_keys_handler).post(create_key_handler))
        .route(
            "/v1/auth/{key}",
            get(get_key_handler)
                .put(update_key_handler)
                .delete(delete_key_handler),
        )
}
