use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The store refused to create a record it considers invalid
    #[error("Creation error: {message}")]
    Creation { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn creation(message: impl Into<String>) -> Self {
        Self::Creation {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::Validation { .. }
                | Self::Conflict { .. }
                | Self::Creation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("User not found");
        assert_eq!(error.to_string(), "Not found: User not found");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("All fields are required");
        assert_eq!(error.to_string(), "Validation error: All fields are required");
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("User already exists");
        assert_eq!(error.to_string(), "Conflict: User already exists");
    }

    #[test]
    fn test_creation_error() {
        let error = DomainError::creation("Invalid user data received");
        assert_eq!(error.to_string(), "Creation error: Invalid user data received");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(DomainError::validation("x").is_client_error());
        assert!(DomainError::conflict("x").is_client_error());
        assert!(DomainError::not_found("x").is_client_error());
        assert!(DomainError::creation("x").is_client_error());
        assert!(!DomainError::storage("x").is_client_error());
        assert!(!DomainError::internal("x").is_client_error());
    }
}
