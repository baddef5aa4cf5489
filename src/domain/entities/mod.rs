//! Core records owned by the backing store.
//!
//! Each record kind comes with a write-side companion:
//! - [`ShortCode`] / [`ShortCodeRecord`] / [`ShortCodeDraft`]
//! - [`ApiKey`] / [`NewApiKey`] / [`ApiKeyDraft`]
//!
//! Drafts are what callers hand to a registry (identity fields may be missing);
//! records are what the registry hands to the store after validation.

pub mod api_key;
pub mod short_code;

pub use api_key::{ApiKey, ApiKeyDraft, NewApiKey};
pub use short_code::{ShortCode, ShortCodeDraft, ShortCodeRecord};
