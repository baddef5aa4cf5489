//! Data Transfer Objects for API requests and responses.
//!
//! JSON field names are camelCase. Request bodies are checked with `validator`
//! before they reach a registry.

pub mod api_key;
pub mod health;
pub mod short_code;
