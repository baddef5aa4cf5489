//! PostgreSQL implementation of API key repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{ApiKey, NewApiKey};
use crate::domain::repositories::ApiKeyRepository;
use crate::error::AppError;

/// PostgreSQL repository for API keys, keyed by `access_key`.
pub struct PgApiKeyRepository {
    pool: Arc<PgPool>,
}

impl PgApiKeyRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ApiKeyRow {
    access_key: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ApiKeyRow> for ApiKey {
    fn from(r: ApiKeyRow) -> Self {
        ApiKey {
            key: r.access_key,
            name: r.name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[async_trait]
impl ApiKeyRepository for PgApiKeyRepository {
    async fn find_by_key(&self, key: &str) -> Result<Option<ApiKey>, AppError> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT access_key, name, created_at, updated_at
            FROM api_key
            WHERE access_key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ApiKey::from))
    }

    async fn find_all(&self) -> Result<Vec<ApiKey>, AppError> {
        let rows = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT access_key, name, created_at, updated_at
            FROM api_key
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ApiKey::from).collect())
    }

    async fn save(&self, new_key: NewApiKey) -> Result<ApiKey, AppError> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            INSERT INTO api_key (access_key, name)
            VALUES ($1, $2)
            ON CONFLICT (access_key)
            DO UPDATE SET name = EXCLUDED.name, updated_at = NOW()
            RETURNING access_key, name, created_at, updated_at
            "#,
        )
        .bind(&new_key.key)
        .bind(&new_key.name)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn rename(&self, key: &str, name: &str) -> Result<Option<ApiKey>, AppError> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            UPDATE api_key
            SET name = $2, updated_at = NOW()
            WHERE access_key = $1
            RETURNING access_key, name, created_at, updated_at
            "#,
        )
        .bind(key)
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ApiKey::from))
    }

    async fn delete_by_key(&self, key: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM api_key WHERE access_key = $1")
            .bind(key)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_key(&self, key: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM api_key WHERE access_key = $1)",
        )
        .bind(key)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn is_empty(&self) -> Result<bool, AppError> {
        let any = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM api_key)")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(!any)
    }
}
