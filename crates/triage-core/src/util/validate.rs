//! Input validation for user-supplied text.

use crate::constants::{PROJECT_KEY_MAX_LEN, PROJECT_KEY_MIN_LEN};
use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Validates a project key and returns it without surrounding whitespace.
///
/// A key is 2 to 10 ASCII uppercase letters. Lowercase input is rejected
/// rather than upper-cased so that the stored key is exactly what the user
/// typed.
///
/// ## Errors
/// Returns `ValidationError` if the key is too short, too long, or contains
/// anything other than `A`-`Z`.
pub fn project_key(raw: &str) -> CoreResult<String> {
    let key = raw.trim();

    if !(PROJECT_KEY_MIN_LEN..=PROJECT_KEY_MAX_LEN).contains(&key.len()) {
        return Err(CoreError::ValidationError(format!(
            "Project key must be {PROJECT_KEY_MIN_LEN} to {PROJECT_KEY_MAX_LEN} letters"
        )));
    }

    if !key.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(CoreError::ValidationError(
            "Project key must contain only uppercase letters A-Z".to_string(),
        ));
    }

    Ok(key.to_string())
}

/// ## Summary
/// Trims `value` and rejects it if nothing is left.
///
/// ## Errors
/// Returns `ValidationError` naming `field` if the trimmed value is empty.
pub fn non_empty(field: &str, value: &str) -> CoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ValidationError(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trims optional free text, treating a blank value as absent.
#[must_use]
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
