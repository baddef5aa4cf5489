//! Repository implementations.
//!
//! PostgreSQL repositories use SQLx with runtime-bound queries; the schema lives
//! in `migrations/` and is applied at startup.
//!
//! # Repositories
//!
//! - [`PgShortCodeRepository`] - Short code storage with soft deletion
//! - [`PgApiKeyRepository`] - API key storage
//! - [`InMemoryShortCodeRepository`], [`InMemoryApiKeyRepository`] - Process-local stores

pub mod in_memory;
pub mod pg_api_key_repository;
pub mod pg_short_code_repository;

pub use in_memory::{InMemoryApiKeyRepository, InMemoryShortCodeRepository};
pub use pg_api_key_repository::PgApiKeyRepository;
pub use pg_short_code_repository::PgShortCodeRepository;
