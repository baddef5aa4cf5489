//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::application::services::{CodeRegistry, KeyRegistry};
use crate::domain::repositories::{ApiKeyRepository, ShortCodeRepository};

pub type SharedCodeRegistry = Arc<CodeRegistry<dyn ShortCodeRepository>>;
pub type SharedKeyRegistry = Arc<KeyRegistry<dyn ApiKeyRepository>>;

#[derive(Clone)]
pub struct AppState {
    pub code_registry: SharedCodeRegistry,
    pub key_registry: SharedKeyRegistry,
}

impl AppState {
    pub fn new(code_registry: SharedCodeRegistry, key_registry: SharedKeyRegistry) -> Self {
        Self {
            code_registry,
            key_registry,
        }
    }
}
