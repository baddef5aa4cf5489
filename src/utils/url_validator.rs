//! Destination URL validation.
//!
//! Destinations are stored exactly as submitted; this module only decides
//! whether they are acceptable redirect targets.

use crate::error::AppError;
use serde_json::json;
use url::Url;

/// Reasons a destination is rejected.
#[derive(Debug, thiserror::Error)]
pub enum DestinationError {
    #[error("redirect url is empty")]
    Empty,

    #[error("URL contains control characters")]
    ControlCharacter,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

impl From<DestinationError> for AppError {
    fn from(e: DestinationError) -> Self {
        AppError::bad_request("Invalid redirect url", json!({ "reason": e.to_string() }))
    }
}

/// Checks that `input` is an absolute `http`/`https` URL with a host.
///
/// Rejects `javascript:`, `data:`, `file:` and other schemes that must never be
/// served as a redirect `Location`. Control characters are rejected outright:
/// [`Url::parse`] silently drops tabs and newlines, but the raw input is what
/// ends up in the `Location` header.
///
/// # Errors
///
/// Returns the first [`DestinationError`] that applies.
pub fn validate_destination(input: &str) -> Result<(), DestinationError> {
    if input.trim().is_empty() {
        return Err(DestinationError::Empty);
    }

    if input.chars().any(char::is_control) {
        return Err(DestinationError::ControlCharacter);
    }

    let url = Url::parse(input).map_err(|e| DestinationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(DestinationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(DestinationError::MissingHost);
    }

    Ok(())
}
