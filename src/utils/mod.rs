//! Utility functions shared by the registries and handlers.
//!
//! - [`code_generator`] - Random code drawing and code format rules
//! - [`url_validator`] - Destination URL checks

pub mod code_generator;
pub mod url_validator;
