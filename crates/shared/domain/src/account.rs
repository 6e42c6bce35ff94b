//! Account domain entity and related types.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Stored representation of a user.
///
/// Accounts are created once by the auth service directory and never
/// mutated afterwards. The password is kept as supplied (no hashing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub username: String,
    pub password: String,
}

impl Account {
    /// Create a new account
    pub fn new(id: u64, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Exact, case-sensitive comparison against the stored password
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// Reject a login whose password does not match this account
    pub fn verify_password(&self, candidate: &str) -> DomainResult<()> {
        if self.password_matches(candidate) {
            Ok(())
        } else {
            Err(DomainError::IncorrectPassword)
        }
    }
}

/// Signup/login payload shared by both message patterns.
///
/// `get_user` only reads `username`; `password` travels along because the
/// wire shape is shared with `create_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

impl SignupRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Account response (safe to return to HTTP clients)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccountResponse {
    /// Account identifier
    pub id: u64,
    /// Account username
    pub username: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
        }
    }
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
        }
    }
}
