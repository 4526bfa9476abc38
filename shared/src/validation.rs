//! Input validation functions
//!
//! Registration and login inputs are checked here before any storage access.

use crate::errors::ValidationError;
use validator::ValidateEmail;

/// Reject a field that is empty or whitespace only
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// Reject an empty password
///
/// Passwords are not trimmed: surrounding whitespace is part of the secret.
pub fn require_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::MissingField("password"));
    }
    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    require("email", email)?;
    if !email.trim().validate_email() {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Canonical form used for storage and lookups
///
/// Emails compare case-insensitively, so every address is trimmed and
/// lowercased before it reaches the repository.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
