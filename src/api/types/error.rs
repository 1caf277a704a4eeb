//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Body of every non-2xx response, and of the confirmation messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: MessageResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: MessageResponse::new(message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::Creation { message } => Self::bad_request(message),
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Conflict { message } => Self::conflict(message),
            // Server-side details stay in the logs.
            DomainError::Storage { message } => {
                tracing::error!(error = %message, "Storage failure");
                Self::internal("Internal server error")
            }
            DomainError::Configuration { message } => {
                tracing::error!(error = %message, "Configuration failure");
                Self::internal("Internal server error")
            }
            DomainError::Internal { message } => {
                tracing::error!(error = %message, "Internal failure");
                Self::internal("Internal server error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.response.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_status_mapping() {
        let cases = [
            (DomainError::validation("All fields are required"), StatusCode::BAD_REQUEST),
            (DomainError::creation("Invalid user data received"), StatusCode::BAD_REQUEST),
            (DomainError::not_found("User not found"), StatusCode::NOT_FOUND),
            (DomainError::conflict("User already exists"), StatusCode::CONFLICT),
            (DomainError::storage("pool timed out"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::configuration("bad"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::internal("join error"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain_err, status) in cases {
            let api_err: ApiError = domain_err.into();
            assert_eq!(api_err.status, status);
        }
    }

    #[test]
    fn test_client_errors_keep_message() {
        let api_err: ApiError = DomainError::conflict("Username already taken").into();
        assert_eq!(api_err.response.message, "Username already taken");
    }

    #[test]
    fn test_server_errors_hide_details() {
        let api_err: ApiError = DomainError::storage("connection refused to 10.0.0.5").into();
        assert_eq!(api_err.response.message, "Internal server error");
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::bad_request("No users found");
        let json = serde_json::to_string(&err.response).unwrap();

        assert_eq!(json, r#"{"message":"No users found"}"#);
    }
}
