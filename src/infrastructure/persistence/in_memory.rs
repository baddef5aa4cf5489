//! In-process repositories backed by `HashMap`s.
//!
//! Used by the test suite and when the service starts without a database.
//! They honour the same contract as the PostgreSQL repositories, including the
//! "one live row per code" constraint. Data is lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{ApiKey, NewApiKey, ShortCode, ShortCodeRecord};
use crate::domain::repositories::{ApiKeyRepository, ShortCodeRepository};
use crate::error::AppError;

/// Short code store held in memory.
#[derive(Default)]
pub struct InMemoryShortCodeRepository {
    rows: RwLock<HashMap<Uuid, ShortCode>>,
}

impl InMemoryShortCodeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShortCodeRepository for InMemoryShortCodeRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShortCode>, AppError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<ShortCode>, AppError> {
        let mut all: Vec<ShortCode> = self.rows.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn find_live_by_code(&self, code: &str) -> Result<Option<ShortCode>, AppError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|row| row.code == code && row.is_live())
            .cloned())
    }

    async fn save(&self, record: ShortCodeRecord) -> Result<ShortCode, AppError> {
        let mut rows = self.rows.write().await;

        if record.deleted_at.is_none()
            && rows
                .values()
                .any(|row| row.code == record.code && row.is_live() && Some(row.id) != record.id)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "short_url_live_code_key" }),
            ));
        }

        let now = Utc::now();
        let saved = match record.id {
            None => ShortCode {
                id: Uuid::new_v4(),
                code: record.code,
                destination: record.destination,
                note: record.note,
                created_at: now,
                updated_at: now,
                deleted_at: record.deleted_at,
            },
            Some(id) => {
                let existing = rows
                    .get(&id)
                    .ok_or_else(|| AppError::not_found("id not found", json!({ "id": id })))?;
                ShortCode {
                    id,
                    code: record.code,
                    destination: record.destination,
                    note: record.note,
                    created_at: existing.created_at,
                    updated_at: now,
                    deleted_at: record.deleted_at,
                }
            }
        };

        rows.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.rows.read().await.contains_key(&id))
    }
}

/// API key store held in memory.
#[derive(Default)]
pub struct InMemoryApiKeyRepository {
    rows: RwLock<HashMap<String, ApiKey>>,
}

impl InMemoryApiKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn find_by_key(&self, key: &str) -> Result<Option<ApiKey>, AppError> {
        Ok(self.rows.read().await.get(key).cloned())
    }

    async fn find_all(&self) -> Result<Vec<ApiKey>, AppError> {
        let mut all: Vec<ApiKey> = self.rows.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn save(&self, new_key: NewApiKey) -> Result<ApiKey, AppError> {
        let mut rows = self.rows.write().await;
        let now = Utc::now();

        let created_at = rows
            .get(&new_key.key)
            .map(|existing| existing.created_at)
            .unwrap_or(now);

        let saved = ApiKey {
            key: new_key.key,
            name: new_key.name,
            created_at,
            updated_at: now,
        };

        rows.insert(saved.key.clone(), saved.clone());
        Ok(saved)
    }

    async fn rename(&self, key: &str, name: &str) -> Result<Option<ApiKey>, AppError> {
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(key).map(|existing| {
            existing.name = name.to_string();
            existing.updated_at = Utc::now();
            existing.clone()
        }))
    }

    async fn delete_by_key(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.rows.write().await.remove(key).is_some())
    }

    async fn exists_by_key(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.rows.read().await.contains_key(key))
    }

    async fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.rows.read().await.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str) -> ShortCodeRecord {
        ShortCodeRecord {
            id: None,
            code: code.to_string(),
            destination: "https://example.com".to_string(),
            note: None,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_short_code_insert_assigns_id() {
        let repo = InMemoryShortCodeRepository::new();

        let saved = repo.save(record("abc123")).await.unwrap();

        assert!(repo.exists_by_id(saved.id).await.unwrap());
        assert_eq!(saved.created_at, saved.updated_at);
    }

    #[tokio::test]
    async fn test_short_code_live_code_is_unique() {
        let repo = InMemoryShortCodeRepository::new();
        repo.save(record("dup")).await.unwrap();

        let result = repo.save(record("dup")).await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_short_code_deleted_code_can_be_reused() {
        let repo = InMemoryShortCodeRepository::new();
        let first = repo.save(record("reuse")).await.unwrap();
        repo.save(ShortCodeRecord {
            id: Some(first.id),
            deleted_at: Some(Utc::now()),
            ..record("reuse")
        })
        .await
        .unwrap();

        assert!(repo.find_live_by_code("reuse").await.unwrap().is_none());
        let second = repo.save(record("reuse")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(
            repo.find_live_by_code("reuse").await.unwrap().unwrap().id,
            second.id
        );
    }

    #[tokio::test]
    async fn test_short_code_update_unknown_id() {
        let repo = InMemoryShortCodeRepository::new();

        let result = repo
            .save(ShortCodeRecord {
                id: Some(Uuid::new_v4()),
                ..record("ghost")
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_api_key_upsert_keeps_created_at() {
        let repo = InMemoryApiKeyRepository::new();
        let first = repo
            .save(NewApiKey {
                key: "k1".to_string(),
                name: "first".to_string(),
            })
            .await
            .unwrap();

        let renamed = repo
            .save(NewApiKey {
                key: "k1".to_string(),
                name: "second".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(renamed.name, "second");
        assert_eq!(renamed.created_at, first.created_at);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_api_key_rename_never_creates() {
        let repo = InMemoryApiKeyRepository::new();

        assert!(repo.rename("ghost", "n").await.unwrap().is_none());
        assert!(repo.is_empty().await.unwrap());

        repo.save(NewApiKey {
            key: "k1".to_string(),
            name: "old".to_string(),
        })
        .await
        .unwrap();

        let renamed = repo.rename("k1", "new").await.unwrap().unwrap();
        assert_eq!(renamed.name, "new");
        assert_eq!(repo.find_by_key("k1").await.unwrap().unwrap().name, "new");
    }

    #[tokio::test]
    async fn test_api_key_delete_and_is_empty() {
        let repo = InMemoryApiKeyRepository::new();
        assert!(repo.is_empty().await.unwrap());

        repo.save(NewApiKey {
            key: "k1".to_string(),
            name: "n".to_string(),
        })
        .await
        .unwrap();
        assert!(!repo.is_empty().await.unwrap());

        assert!(repo.delete_by_key("k1").await.unwrap());
        assert!(!repo.delete_by_key("k1").await.unwrap());
        assert!(repo.is_empty().await.unwrap());
    }
}
