//! Authentication facade - login and signup on top of the auth-service client.
//!
//! Business errors are decided here, after a successful reply. Transport
//! errors pass through untouched and are never retried.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use common::AppResult;
use domain::{Account, DomainError, SignupRequest};

use crate::clients::AuthClient;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Look up an account by the request's username
    async fn get_user(&self, request: &SignupRequest) -> AppResult<Option<Account>>;

    /// Create an account without checking for duplicates
    async fn create_user(&self, request: &SignupRequest) -> AppResult<Account>;

    /// Verify credentials and return the matching account
    async fn login(&self, request: &SignupRequest) -> AppResult<Account>;

    /// Create an account if the username is free
    async fn signup(&self, request: &SignupRequest) -> AppResult<Account>;
}

/// Concrete implementation of AuthService using the message transport.
pub struct AuthFacade {
    client: Arc<AuthClient>,
}

impl AuthFacade {
    /// Create new facade instance
    pub fn new(client: Arc<AuthClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthService for AuthFacade {
    async fn get_user(&self, request: &SignupRequest) -> AppResult<Option<Account>> {
        self.client.get_user(request).await
    }

    async fn create_user(&self, request: &SignupRequest) -> AppResult<Account> {
        self.client.create_user(request).await
    }

    async fn login(&self, request: &SignupRequest) -> AppResult<Account> {
        debug!(username = %request.username, "Login attempt");

        let account = self
            .get_user(request)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        account.verify_password(&request.password)?;

        Ok(account)
    }

    async fn signup(&self, request: &SignupRequest) -> AppResult<Account> {
        // Check-then-create: two concurrent signups for one username can
        // both pass the check.
        if self.get_user(request).await?.is_some() {
            return Err(DomainError::username_taken(&request.username).into());
        }

        let account = self.create_user(request).await?;
        info!(id = account.id, username = %account.username, "Signed up");
        Ok(account)
    }
}
