//! API key entity.

use chrono::{DateTime, Utc};

/// A stored API key.
///
/// The key string is both the credential and the primary identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiKey {
    pub key: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated write passed to the store (upsert by `key`).
#[derive(Debug, Clone, PartialEq)]
pub struct NewApiKey {
    pub key: String,
    pub name: String,
}

/// Caller input for creating or renaming a key.
///
/// A missing `key` asks the registry to generate one.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyDraft {
    pub key: Option<String>,
    pub name: String,
}
