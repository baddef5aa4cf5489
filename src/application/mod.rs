//! Application layer: the two registries that sit between HTTP handlers and storage.
//!
//! Both registries consume repository traits and keep a read-through
//! [`LoadingCache`](crate::infrastructure::cache::LoadingCache) in front of them.
//!
//! # Available Services
//!
//! - [`services::CodeRegistry`] - Short code generation, validation and resolution
//! - [`services::KeyRegistry`] - API key issuance, validation and startup bootstrap

pub mod services;
