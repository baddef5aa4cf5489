//! Repository trait for short code storage.

use crate::domain::entities::{ShortCode, ShortCodeRecord};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Store contract for short codes.
///
/// Rows are never physically removed by the registry; deletion is a write that
/// sets `deleted_at`.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortCodeRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryShortCodeRepository`] - in-process map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortCodeRepository: Send + Sync {
    /// Finds an entry by id, live or soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShortCode>, AppError>;

    /// Lists every entry, including soft-deleted ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_all(&self) -> Result<Vec<ShortCode>, AppError>;

    /// Finds the live entry holding `code`.
    ///
    /// Entries with `deleted_at` set are never returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_live_by_code(&self, code: &str) -> Result<Option<ShortCode>, AppError>;

    /// Inserts (`record.id == None`) or updates an entry and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if another live entry already holds the code.
    /// Returns [`AppError::NotFound`] when updating an id that does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn save(&self, record: ShortCodeRecord) -> Result<ShortCode, AppError>;

    /// Checks whether an entry with this id exists, live or soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn exists_by_id(&self, id: Uuid) -> Result<bool, AppError>;
}
