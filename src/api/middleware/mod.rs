//! HTTP middleware for request processing and protection.
//!
//! Provides API key authentication and request tracing.

pub mod auth;
pub mod tracing;
