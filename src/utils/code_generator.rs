//! Short code generation and format validation.
//!
//! Only the format rules live here. Uniqueness against live entries needs the
//! store and is checked by [`crate::application::services::CodeRegistry`].

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;

/// Length of the first generated candidate.
pub const INITIAL_CODE_LENGTH: usize = 6;

/// Consecutive collisions tolerated at one length before growing by one.
pub const MAX_ATTEMPTS_PER_LENGTH: usize = 10;

/// Codes must be strictly shorter than this many characters.
pub const MAX_CODE_LENGTH: usize = 144;

/// Returns `length` random characters from `[A-Za-z0-9]`.
///
/// Consecutive calls are not guaranteed to differ.
///
/// # Examples
///
/// ```ignore
/// let code = generate_random_code(8);
/// assert_eq!(code.len(), 8);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_random_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Treats `None`, `""` and whitespace-only codes alike: "generate one for me".
pub fn is_blank(code: Option<&str>) -> bool {
    code.is_none_or(|c| c.trim().is_empty())
}

/// Checks the format rules of a code.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the code is empty or has
/// [`MAX_CODE_LENGTH`] characters or more.
pub fn validate_code_format(code: &str) -> Result<(), AppError> {
    if code.is_empty() {
        return Err(AppError::bad_request("code is empty", json!({})));
    }

    let length = code.chars().count();
    if length >= MAX_CODE_LENGTH {
        return Err(AppError::bad_request(
            "code is too long",
            json!({ "provided_length": length, "max_length": MAX_CODE_LENGTH - 1 }),
        ));
    }

    Ok(())
}
