//! Repository trait for API key storage.

use crate::domain::entities::{ApiKey, NewApiKey};
use crate::error::AppError;
use async_trait::async_trait;

/// Store contract for API keys.
///
/// Keys are hard-deleted: a revoked key leaves no row behind.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgApiKeyRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryApiKeyRepository`] - in-process map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Finds a key record by the key itself.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_key(&self, key: &str) -> Result<Option<ApiKey>, AppError>;

    /// Lists all keys.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_all(&self) -> Result<Vec<ApiKey>, AppError>;

    /// Creates the key or renames it if it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn save(&self, new_key: NewApiKey) -> Result<ApiKey, AppError>;

    /// Renames an existing key. Returns `Ok(None)` if it does not exist;
    /// never creates a row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn rename(&self, key: &str, name: &str) -> Result<Option<ApiKey>, AppError>;

    /// Deletes the key. Returns `Ok(false)` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_by_key(&self, key: &str) -> Result<bool, AppError>;

    /// Checks whether the key exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn exists_by_key(&self, key: &str) -> Result<bool, AppError>;

    /// Returns true when no key is stored at all.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn is_empty(&self) -> Result<bool, AppError>;
}
