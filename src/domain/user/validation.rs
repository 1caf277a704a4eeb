//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID cannot be empty")]
    EmptyId,

    #[error("User ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("User ID cannot contain whitespace")]
    IdWhitespace,

    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("At least one role is required")]
    EmptyRoles,

    #[error("Role names cannot be blank")]
    BlankRole,
}

const MAX_USER_ID_LENGTH: usize = 64;

/// Validate a user ID
///
/// IDs are opaque, so only the shape is checked:
/// - Cannot be empty
/// - Maximum 64 characters
/// - No whitespace
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    if id.is_empty() {
        return Err(UserValidationError::EmptyId);
    }

    if id.chars().count() > MAX_USER_ID_LENGTH {
        return Err(UserValidationError::IdTooLong(MAX_USER_ID_LENGTH));
    }

    if id.chars().any(char::is_whitespace) {
        return Err(UserValidationError::IdWhitespace);
    }

    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::EmptyPassword);
    }

    Ok(())
}

/// Validate a role list for an update: non-empty, no blank entries
pub fn validate_roles(roles: &[String]) -> Result<(), UserValidationError> {
    if roles.is_empty() {
        return Err(UserValidationError::EmptyRoles);
    }

    if roles.iter().any(|r| r.trim().is_empty()) {
        return Err(UserValidationError::BlankRole);
    }

    Ok(())
}
