//! Unified error handling for HTTP and the message transport.
//!
//! Provides a single error type that can be converted to:
//! - Axum HTTP responses (for the gateway)
//! - Error replies on the message transport (for the auth service)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Application error types with support for HTTP and message replies.
#[derive(Error, Debug)]
pub enum AppError {
    // Business rules (raised by the gateway after a successful reply)
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // Message routing
    #[error("There is no matching message handler defined in the remote service.")]
    UnknownPattern(String),

    /// Error reply produced by the remote handler
    #[error("Remote error: {0}")]
    Remote(String),

    // Transport
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    #[error("Request timed out after {0} ms")]
    TransportTimeout(u64),

    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::IncorrectPassword => "INCORRECT_PASSWORD",
            AppError::UsernameTaken(_) => "USERNAME_TAKEN",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::UnknownPattern(_) => "UNKNOWN_PATTERN",
            AppError::Remote(_) => "REMOTE_ERROR",
            AppError::TransportFailure(_) => "TRANSPORT_FAILURE",
            AppError::TransportTimeout(_) => "TRANSPORT_TIMEOUT",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::IncorrectPassword => StatusCode::UNAUTHORIZED,
            AppError::UsernameTaken(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Remote(_) => StatusCode::BAD_GATEWAY,
            AppError::TransportFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::TransportTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if the error is a business rule rejection
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            AppError::InvalidCredentials | AppError::IncorrectPassword | AppError::UsernameTaken(_)
        )
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),

            // Hide details for internal/infrastructure errors
            AppError::UnknownPattern(pattern) => {
                tracing::warn!("No handler for message pattern: {}", pattern);
                self.to_string()
            }
            AppError::Remote(msg) => {
                tracing::error!("Remote handler error: {}", msg);
                "The auth service rejected the request".to_string()
            }
            AppError::TransportFailure(msg) => {
                tracing::error!("Transport failure: {}", msg);
                "The auth service is unavailable".to_string()
            }
            AppError::TransportTimeout(ms) => {
                tracing::error!("Transport timeout after {} ms", ms);
                "The auth service did not respond in time".to_string()
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                "A message encoding error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.is_business() {
            tracing::debug!(code = self.code(), "Request rejected: {}", self);
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidCredentials => AppError::InvalidCredentials,
            DomainError::IncorrectPassword => AppError::IncorrectPassword,
            DomainError::UsernameTaken(username) => AppError::UsernameTaken(username),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        AppError::Remote(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        AppError::TransportFailure(msg.into())
    }

    pub fn unknown_pattern(pattern: impl Into<String>) -> Self {
        AppError::UnknownPattern(pattern.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_errors_are_client_errors() {
        for err in [
            AppError::InvalidCredentials,
            AppError::IncorrectPassword,
            AppError::UsernameTaken("alice".to_string()),
        ] {
            assert!(err.is_business());
            assert!(err.status().is_client_error());
            assert_eq!(err.user_message(), err.to_string());
        }
    }

    #[test]
    fn test_timeout_is_distinct_from_failure() {
        let timeout = AppError::TransportTimeout(250);
        let failure = AppError::transport("connection refused");

        assert_eq!(timeout.code(), "TRANSPORT_TIMEOUT");
        assert_eq!(failure.code(), "TRANSPORT_FAILURE");
        assert_ne!(timeout.status(), failure.status());
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::transport("connect to 10.0.0.4:3001 refused");
        assert!(!err.user_message().contains("10.0.0.4"));
    }

    #[test]
    fn test_domain_error_conversion() {
        let err: AppError = DomainError::username_taken("bob").into();
        assert!(matches!(err, AppError::UsernameTaken(ref u) if u == "bob"));
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::UsernameTaken("alice".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
