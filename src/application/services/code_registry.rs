//! Short code registry: generation, validation, resolution and soft deletion.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::entities::{ShortCode, ShortCodeDraft, ShortCodeRecord};
use crate::domain::repositories::ShortCodeRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheLoader, CachePolicy, LoadingCache};
use crate::utils::code_generator::{
    INITIAL_CODE_LENGTH, MAX_ATTEMPTS_PER_LENGTH, generate_random_code, is_blank,
    validate_code_format,
};
use crate::utils::url_validator::validate_destination;

/// Feeds the code cache from the store, live entries only.
struct LiveCodeLoader<R: ?Sized> {
    repository: Arc<R>,
}

#[async_trait]
impl<R> CacheLoader<String, ShortCode> for LiveCodeLoader<R>
where
    R: ShortCodeRepository + ?Sized + 'static,
{
    async fn load(&self, code: &String) -> Result<Option<ShortCode>, AppError> {
        self.repository.find_live_by_code(code).await
    }
}

/// Registry of short codes.
///
/// Lookups by code go through a [`LoadingCache`] that holds live entries and
/// "no such code" answers. Every write invalidates the affected codes so
/// neither kind of cached answer outlives the write.
///
/// The conflict check in [`Self::validate`] and the subsequent store write are
/// not atomic: two concurrent saves may both pass validation for the same code.
/// The store's unique index on live codes rejects the second write with
/// [`AppError::Conflict`].
pub struct CodeRegistry<R: ShortCodeRepository + ?Sized> {
    repository: Arc<R>,
    cache: LoadingCache<String, ShortCode>,
}

impl<R> CodeRegistry<R>
where
    R: ShortCodeRepository + ?Sized + 'static,
{
    /// Creates a registry with its own cache.
    pub fn new(repository: Arc<R>, policy: CachePolicy) -> Self {
        let loader = Arc::new(LiveCodeLoader {
            repository: Arc::clone(&repository),
        });

        Self {
            repository,
            cache: LoadingCache::new(policy, loader),
        }
    }

    /// The registry's cache, for eviction scheduling and health reporting.
    pub fn cache(&self) -> &LoadingCache<String, ShortCode> {
        &self.cache
    }

    /// Resolves a code to its live entry.
    ///
    /// Soft-deleted entries are never returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store fails on a cache miss.
    pub async fn resolve(&self, code: &str) -> Result<Option<ShortCode>, AppError> {
        // No entry can hold a malformed code; keep it out of the cache.
        if validate_code_format(code).is_err() {
            return Ok(None);
        }

        let entry = self.cache.get(&code.to_string()).await?;
        Ok(entry.filter(ShortCode::is_live))
    }

    /// Gets an entry by id straight from the store, including deleted ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn get(&self, id: Uuid) -> Result<Option<ShortCode>, AppError> {
        self.repository.find_by_id(id).await
    }

    /// Lists every entry, including deleted ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn list(&self) -> Result<Vec<ShortCode>, AppError> {
        self.repository.find_all().await
    }

    /// Creates (`draft.id == None`) or replaces a short code.
    ///
    /// A missing or blank code is replaced by [`Self::generate_code`]. On update
    /// the stored `deleted_at` is kept as is.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a bad code or destination.
    /// Returns [`AppError::Conflict`] if another live entry holds the code.
    /// Returns [`AppError::NotFound`] if `draft.id` does not exist.
    pub async fn save(&self, draft: ShortCodeDraft) -> Result<ShortCode, AppError> {
        let existing = match draft.id {
            Some(id) => Some(
                self.repository
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::not_found("id not found", json!({ "id": id })))?,
            ),
            None => None,
        };

        validate_destination(&draft.destination)?;

        let code = match draft.code {
            Some(code) if !is_blank(Some(&code)) => {
                self.validate_for(&code, draft.id).await?;
                code
            }
            _ => self.generate_code().await?,
        };

        let record = ShortCodeRecord {
            id: draft.id,
            code,
            destination: draft.destination,
            note: draft.note,
            deleted_at: existing.as_ref().and_then(|e| e.deleted_at),
        };

        let saved = self.repository.save(record).await?;

        self.cache.invalidate(&saved.code).await;
        if let Some(previous) = existing.filter(|e| e.code != saved.code) {
            self.cache.invalidate(&previous.code).await;
        }

        info!(id = %saved.id, code = %saved.code, "Saved short code");
        Ok(saved)
    }

    /// Soft-deletes the entry with `id`.
    ///
    /// Unknown ids are a no-op returning `Ok(None)`. An entry that is already
    /// deleted is returned unchanged; `deleted_at` is only ever set once.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn remove(&self, id: Uuid) -> Result<Option<ShortCode>, AppError> {
        let Some(entry) = self.repository.find_by_id(id).await? else {
            debug!(%id, "Remove of unknown short code ignored");
            return Ok(None);
        };

        if !entry.is_live() {
            return Ok(Some(entry));
        }

        let deleted = self
            .repository
            .save(ShortCodeRecord {
                id: Some(entry.id),
                code: entry.code,
                destination: entry.destination,
                note: entry.note,
                deleted_at: Some(Utc::now()),
            })
            .await?;

        self.cache.invalidate(&deleted.code).await;

        info!(id = %deleted.id, code = %deleted.code, "Soft-deleted short code");
        Ok(Some(deleted))
    }

    /// Validates a code for a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the code is empty or 144+ characters.
    /// Returns [`AppError::Conflict`] if a live entry already holds it.
    pub async fn validate(&self, code: &str) -> Result<(), AppError> {
        self.validate_for(code, None).await
    }

    /// Like [`Self::validate`], but an entry with id `owner` may keep its own code.
    async fn validate_for(&self, code: &str, owner: Option<Uuid>) -> Result<(), AppError> {
        validate_code_format(code)?;

        if let Some(holder) = self.repository.find_live_by_code(code).await?
            && Some(holder.id) != owner
        {
            return Err(AppError::conflict(
                "code already exists",
                json!({ "code": code }),
            ));
        }

        Ok(())
    }

    /// Generates a code no live entry holds at the time of return.
    ///
    /// Starts at [`INITIAL_CODE_LENGTH`] characters and grows by one after
    /// [`MAX_ATTEMPTS_PER_LENGTH`] consecutive collisions. The loop has no upper
    /// bound; at 62^n candidates per length it terminates in practice.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn generate_code(&self) -> Result<String, AppError> {
        let mut length = INITIAL_CODE_LENGTH;
        let mut collisions = 0;

        loop {
            let code = generate_random_code(length);

            if self.repository.find_live_by_code(&code).await?.is_none() {
                self.validate(&code).await?;
                return Ok(code);
            }

            collisions += 1;
            debug!(length, collisions, "Generated code collided");
            if collisions >= MAX_ATTEMPTS_PER_LENGTH {
                length += 1;
                collisions = 0;
            }
        }
    }
}
