//! Repository trait definitions for the domain layer.
//!
//! These traits are the store contract consumed by the registries. Concrete
//! implementations live in `crate::infrastructure::persistence`:
//!
//! - PostgreSQL (`Pg*Repository`) for production
//! - In-memory (`InMemory*Repository`) for tests and database-less runs
//!
//! Mock implementations are generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`ShortCodeRepository`] - Short code storage with soft deletion
//! - [`ApiKeyRepository`] - API key storage with hard deletion

pub mod api_key_repository;
pub mod short_code_repository;

pub use api_key_repository::ApiKeyRepository;
pub use short_code_repository::ShortCodeRepository;

#[cfg(test)]
pub use api_key_repository::MockApiKeyRepository;
#[cfg(test)]
pub use short_code_repository::MockShortCodeRepository;
