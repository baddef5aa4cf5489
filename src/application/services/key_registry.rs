//! API key registry and startup bootstrap.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::{ApiKey, ApiKeyDraft, NewApiKey};
use crate::domain::repositories::ApiKeyRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheLoader, CachePolicy, LoadingCache};

/// Name given to the key created by [`KeyRegistry::bootstrap`].
pub const DEFAULT_KEY_NAME: &str = "Default Key";

/// Longest accepted key name, in characters.
pub const MAX_KEY_NAME_LENGTH: usize = 255;

/// Why [`KeyRegistry::bootstrap`] did not create a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The configured key is already stored.
    AlreadyExists,
    /// Another key is stored; the store is only seeded when empty.
    StoreNotEmpty,
}

/// Result of seeding the store with the configured default key.
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapOutcome {
    Created(ApiKey),
    Skipped(SkipReason),
}

/// Failures of [`KeyRegistry::create_default_key`].
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Invalid key")]
    InvalidKey,

    #[error("Key already exists")]
    AlreadyExists,

    #[error("There is already a key")]
    StoreNotEmpty,

    #[error(transparent)]
    Store(#[from] AppError),
}

/// Shows only the first four characters of a credential.
fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}***")
}

struct KeyLoader<R: ?Sized> {
    repository: Arc<R>,
}

#[async_trait]
impl<R> CacheLoader<String, ApiKey> for KeyLoader<R>
where
    R: ApiKeyRepository + ?Sized + 'static,
{
    async fn load(&self, key: &String) -> Result<Option<ApiKey>, AppError> {
        self.repository.find_by_key(key).await
    }
}

/// Registry of API keys.
///
/// [`Self::validate`] is the authentication hot path and is always answered
/// through the cache. Writes and deletes invalidate the key's cache slot, so a
/// removed key stops authenticating immediately.
pub struct KeyRegistry<R: ApiKeyRepository + ?Sized> {
    repository: Arc<R>,
    cache: LoadingCache<String, ApiKey>,
}

impl<R> KeyRegistry<R>
where
    R: ApiKeyRepository + ?Sized + 'static,
{
    pub fn new(repository: Arc<R>, policy: CachePolicy) -> Self {
        let loader = Arc::new(KeyLoader {
            repository: Arc::clone(&repository),
        });

        Self {
            repository,
            cache: LoadingCache::new(policy, loader),
        }
    }

    pub fn cache(&self) -> &LoadingCache<String, ApiKey> {
        &self.cache
    }

    /// Looks a key up through the cache.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store fails on a cache miss.
    pub async fn resolve(&self, key: &str) -> Result<Option<ApiKey>, AppError> {
        self.cache.get(&key.to_string()).await
    }

    /// Whether `key` is a known API key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store fails on a cache miss.
    pub async fn validate(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.resolve(key).await?.is_some())
    }

    /// Reads a key straight from the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn get(&self, key: &str) -> Result<Option<ApiKey>, AppError> {
        self.repository.find_by_key(key).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn list(&self) -> Result<Vec<ApiKey>, AppError> {
        self.repository.find_all().await
    }

    /// Creates or renames a key. A missing key is generated as a UUIDv4 string.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank key or a blank or overlong name.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn save(&self, draft: ApiKeyDraft) -> Result<ApiKey, AppError> {
        validate_name(&draft.name)?;

        let key = match draft.key {
            Some(key) if key.trim().is_empty() => {
                return Err(AppError::bad_request("key is empty", json!({})));
            }
            Some(key) => key,
            None => Uuid::new_v4().to_string(),
        };

        let saved = self
            .repository
            .save(NewApiKey {
                key,
                name: draft.name,
            })
            .await?;

        self.cache.invalidate(&saved.key).await;

        info!(key = %mask_key(&saved.key), name = %saved.name, "Saved API key");
        Ok(saved)
    }

    /// Renames an existing key. Returns `Ok(None)` for an unknown key; a key
    /// revoked concurrently stays revoked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank or overlong name.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn rename(&self, key: &str, name: &str) -> Result<Option<ApiKey>, AppError> {
        validate_name(name)?;

        let renamed = self.repository.rename(key, name).await?;
        self.cache.invalidate(&key.to_string()).await;

        if let Some(ref renamed) = renamed {
            info!(key = %mask_key(key), name = %renamed.name, "Renamed API key");
        }
        Ok(renamed)
    }

    /// Hard-deletes a key. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn remove(&self, key: &str) -> Result<bool, AppError> {
        let removed = self.repository.delete_by_key(key).await?;
        self.cache.invalidate(&key.to_string()).await;

        if removed {
            info!(key = %mask_key(key), "Removed API key");
        } else {
            debug!(key = %mask_key(key), "Remove of unknown API key ignored");
        }
        Ok(removed)
    }

    /// Seeds the store with `default_key` if it holds no keys at all.
    ///
    /// Skips are logged at info and reported as values.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank key and
    /// [`AppError::Internal`] on store errors. Both abort startup.
    pub async fn bootstrap(&self, default_key: &str) -> Result<BootstrapOutcome, AppError> {
        match self.create_default_key(default_key).await {
            Ok(created) => Ok(BootstrapOutcome::Created(created)),
            Err(BootstrapError::InvalidKey) => Err(AppError::bad_request(
                "Invalid key",
                json!({ "reason": "default API key is blank" }),
            )),
            Err(BootstrapError::AlreadyExists) => {
                info!("Default key already exists, skipping");
                Ok(BootstrapOutcome::Skipped(SkipReason::AlreadyExists))
            }
            Err(BootstrapError::StoreNotEmpty) => {
                info!("API keys already present, skipping default key");
                Ok(BootstrapOutcome::Skipped(SkipReason::StoreNotEmpty))
            }
            Err(BootstrapError::Store(e)) => Err(e),
        }
    }

    /// Creates the [`DEFAULT_KEY_NAME`] entry for `key`, failing on every
    /// reason not to.
    ///
    /// # Errors
    ///
    /// See [`BootstrapError`].
    pub async fn create_default_key(&self, key: &str) -> Result<ApiKey, BootstrapError> {
        if key.trim().is_empty() {
            return Err(BootstrapError::InvalidKey);
        }

        if self.repository.exists_by_key(key).await? {
            return Err(BootstrapError::AlreadyExists);
        }

        if !self.repository.is_empty().await? {
            return Err(BootstrapError::StoreNotEmpty);
        }

        let created = self
            .repository
            .save(NewApiKey {
                key: key.to_string(),
                name: DEFAULT_KEY_NAME.to_string(),
            })
            .await?;

        self.cache.invalidate(&created.key).await;

        info!(key = %mask_key(&created.key), "Created default API key");
        Ok(created)
    }

    /// Probes the store for the health endpoint.
    pub async fn is_store_reachable(&self) -> bool {
        match self.repository.is_empty().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "API key store unreachable");
                false
            }
        }
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::bad_request("name is empty", json!({})));
    }

    let length = name.chars().count();
    if length > MAX_KEY_NAME_LENGTH {
        return Err(AppError::bad_request(
            "name is too long",
            json!({ "provided_length": length, "max_length": MAX_KEY_NAME_LENGTH }),
        ));
    }

    Ok(())
}
