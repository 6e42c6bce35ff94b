//! Domain-level errors.
//!
//! These errors represent business rule violations detected by the gateway
//! after inspecting a successful reply from the auth service.
//! They are independent of infrastructure concerns (HTTP, transport).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Login attempted for a username with no matching account
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Login attempted with a password that does not match the stored one
    #[error("Incorrect password")]
    IncorrectPassword,

    /// Signup attempted for a username that already has an account
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),
}

impl DomainError {
    /// Create a username taken error
    pub fn username_taken(username: impl Into<String>) -> Self {
        DomainError::UsernameTaken(username.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_only_echo_the_supplied_username() {
        assert_eq!(DomainError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(DomainError::IncorrectPassword.to_string(), "Incorrect password");
        assert_eq!(
            DomainError::username_taken("alice").to_string(),
            "Username 'alice' is already taken"
        );
    }
}
