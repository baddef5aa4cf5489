//! Registries backing the HTTP surface.

pub mod code_registry;
pub mod key_registry;

pub use code_registry::CodeRegistry;
pub use key_registry::{
    BootstrapError, BootstrapOutcome, DEFAULT_KEY_NAME, KeyRegistry, SkipReason,
};
