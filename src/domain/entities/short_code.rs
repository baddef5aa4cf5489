//! Short code entity: a token that redirects to a destination URL.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A stored short code.
///
/// `code` is unique among live entries only: once `deleted_at` is set the code
/// may be taken by a new entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortCode {
    pub id: Uuid,
    pub code: String,
    pub destination: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ShortCode {
    /// Returns true if the entry has not been soft-deleted.
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Validated write passed to the store.
///
/// `id: None` inserts a new row (the store assigns the id and timestamps);
/// `id: Some` replaces the mutable fields of an existing row.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortCodeRecord {
    pub id: Option<Uuid>,
    pub code: String,
    pub destination: String,
    pub note: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Caller input for creating or replacing a short code.
///
/// A missing or blank `code` asks the registry to generate one.
#[derive(Debug, Clone, Default)]
pub struct ShortCodeDraft {
    pub id: Option<Uuid>,
    pub code: Option<String>,
    pub destination: String,
    pub note: Option<String>,
}
