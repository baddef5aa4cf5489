//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into registry operations and formats
//! responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - API key authentication and request tracing
//! - [`routes`] - Protected route table

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
