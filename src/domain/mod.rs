//! Domain layer: entities and repository contracts.
//!
//! Nothing in here knows about HTTP, SQL or caching. The registries in
//! [`crate::application::services`] consume the repository traits, and the
//! infrastructure layer implements them.
//!
//! - [`entities`] - Short code and API key records
//! - [`repositories`] - Store contracts implemented by [`crate::infrastructure::persistence`]

pub mod entities;
pub mod repositories;
