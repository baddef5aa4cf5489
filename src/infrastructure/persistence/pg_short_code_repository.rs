//! PostgreSQL implementation of short code repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{ShortCode, ShortCodeRecord};
use crate::domain::repositories::ShortCodeRepository;
use crate::error::AppError;

/// PostgreSQL repository for short codes.
///
/// Relies on the `short_url_live_code_key` partial unique index to reject a
/// second live row with the same code.
pub struct PgShortCodeRepository {
    pool: Arc<PgPool>,
}

impl PgShortCodeRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ShortCodeRow {
    id: Uuid,
    code: String,
    redirect_url: String,
    note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<ShortCodeRow> for ShortCode {
    fn from(r: ShortCodeRow) -> Self {
        ShortCode {
            id: r.id,
            code: r.code,
            destination: r.redirect_url,
            note: r.note,
            created_at: r.created_at,
            updated_at: r.updated_at,
            deleted_at: r.deleted_at,
        }
    }
}

const COLUMNS: &str = "id, code, redirect_url, note, created_at, updated_at, deleted_at";

#[async_trait]
impl ShortCodeRepository for PgShortCodeRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShortCode>, AppError> {
        let row = sqlx::query_as::<_, ShortCodeRow>(&format!(
            "SELECT {COLUMNS} FROM short_url WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortCode::from))
    }

    async fn find_all(&self) -> Result<Vec<ShortCode>, AppError> {
        let rows = sqlx::query_as::<_, ShortCodeRow>(&format!(
            "SELECT {COLUMNS} FROM short_url ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ShortCode::from).collect())
    }

    async fn find_live_by_code(&self, code: &str) -> Result<Option<ShortCode>, AppError> {
        let row = sqlx::query_as::<_, ShortCodeRow>(&format!(
            "SELECT {COLUMNS} FROM short_url WHERE code = $1 AND deleted_at IS NULL"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortCode::from))
    }

    async fn save(&self, record: ShortCodeRecord) -> Result<ShortCode, AppError> {
        let row = match record.id {
            None => {
                sqlx::query_as::<_, ShortCodeRow>(&format!(
                    r#"
                    INSERT INTO short_url (code, redirect_url, note, deleted_at)
                    VALUES ($1, $2, $3, $4)
                    RETURNING {COLUMNS}
                    "#
                ))
                .bind(&record.code)
                .bind(&record.destination)
                .bind(&record.note)
                .bind(record.deleted_at)
                .fetch_one(self.pool.as_ref())
                .await?
            }
            Some(id) => sqlx::query_as::<_, ShortCodeRow>(&format!(
                r#"
                    UPDATE short_url
                    SET code = $2,
                        redirect_url = $3,
                        note = $4,
                        deleted_at = $5,
                        updated_at = NOW()
                    WHERE id = $1
                    RETURNING {COLUMNS}
                    "#
            ))
            .bind(id)
            .bind(&record.code)
            .bind(&record.destination)
            .bind(&record.note)
            .bind(record.deleted_at)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("id not found", json!({ "id": id })))?,
        };

        Ok(row.into())
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM short_url WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }
}
