#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::json;
use short_url::application::services::{CodeRegistry, KeyRegistry};
use short_url::domain::entities::{ApiKey, NewApiKey};
use short_url::domain::repositories::{ApiKeyRepository, ShortCodeRepository};
use short_url::error::AppError;
use short_url::infrastructure::cache::CachePolicy;
use short_url::infrastructure::persistence::{
    InMemoryApiKeyRepository, InMemoryShortCodeRepository, PgApiKeyRepository,
    PgShortCodeRepository,
};
use short_url::routes::router;
use short_url::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;

/// Bootstrap key seeded into every test state.
pub const ADMIN_KEY: &str = "test-admin-key";

pub const API_KEY_HEADER: &str = "API-Key";

async fn state_from(
    codes: Arc<dyn ShortCodeRepository>,
    keys: Arc<dyn ApiKeyRepository>,
) -> AppState {
    let policy = CachePolicy::default();
    let code_registry = Arc::new(CodeRegistry::new(codes, policy));
    let key_registry = Arc::new(KeyRegistry::new(keys, policy));

    key_registry.bootstrap(ADMIN_KEY).await.unwrap();

    AppState::new(code_registry, key_registry)
}

pub async fn create_test_state() -> AppState {
    state_from(
        Arc::new(InMemoryShortCodeRepository::new()),
        Arc::new(InMemoryApiKeyRepository::new()),
    )
    .await
}

pub async fn create_pg_state(pool: PgPool) -> AppState {
    let pool = Arc::new(pool);
    state_from(
        Arc::new(PgShortCodeRepository::new(pool.clone())),
        Arc::new(PgApiKeyRepository::new(pool)),
    )
    .await
}

pub async fn create_test_server() -> (TestServer, AppState) {
    let state = create_test_state().await;
    let server = TestServer::new(router(state.clone())).unwrap();
    (server, state)
}

/// Creates a short code through the API and returns the response body.
pub async fn create_short_code(
    server: &TestServer,
    code: Option<&str>,
    url: &str,
) -> serde_json::Value {
    let response = server
        .post("/api/v1/shorturl")
        .add_header(API_KEY_HEADER, ADMIN_KEY)
        .json(&json!({ "code": code, "redirectUrl": url }))
        .await;

    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<serde_json::Value>()
}

/// Key store whose every call fails, for health checks.
pub struct UnreachableKeyStore;

fn unreachable() -> AppError {
    AppError::internal("Database error", json!({}))
}

#[async_trait]
impl ApiKeyRepository for UnreachableKeyStore {
    async fn find_by_key(&self, _key: &str) -> Result<Option<ApiKey>, AppError> {
        Err(unreachable())
    }

    async fn find_all(&self) -> Result<Vec<ApiKey>, AppError> {
        Err(unreachable())
    }

    async fn save(&self, _new_key: NewApiKey) -> Result<ApiKey, AppError> {
        Err(unreachable())
    }

    async fn rename(&self, _key: &str, _name: &str) -> Result<Option<ApiKey>, AppError> {
        Err(unreachable())
    }

    async fn delete_by_key(&self, _key: &str) -> Result<bool, AppError> {
        Err(unreachable())
    }

    async fn exists_by_key(&self, _key: &str) -> Result<bool, AppError> {
        Err(unreachable())
    }

    async fn is_empty(&self) -> Result<bool, AppError> {
        Err(unreachable())
    }
}

/// State over a key store that is down. Bootstrap is skipped.
pub fn create_unreachable_state() -> AppState {
    let policy = CachePolicy::default();
    let codes: Arc<dyn ShortCodeRepository> = Arc::new(InMemoryShortCodeRepository::new());
    let keys: Arc<dyn ApiKeyRepository> = Arc::new(UnreachableKeyStore);

    AppState::new(
        Arc::new(CodeRegistry::new(codes, policy)),
        Arc::new(KeyRegistry::new(keys, policy)),
    )
}
