//! Account service - stateless pass-through to the user directory.
//!
//! `create_user` deliberately performs no duplicate check: a direct create
//! bypasses the uniqueness rule, which the gateway applies during signup.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use common::AppResult;
use domain::{Account, SignupRequest};

use crate::repository::UserDirectory;

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Store a new account unconditionally
    async fn create_user(&self, request: SignupRequest) -> AppResult<Account>;

    /// Look up an account by username
    async fn get_user(&self, username: &str) -> AppResult<Option<Account>>;
}

/// Concrete implementation of AccountService backed by a directory.
pub struct AccountManager {
    directory: Arc<dyn UserDirectory>,
}

impl AccountManager {
    /// Create new account service instance with directory
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn create_user(&self, request: SignupRequest) -> AppResult<Account> {
        let account = self.directory.save(request).await;
        info!(id = account.id, username = %account.username, "Account created");
        Ok(account)
    }

    async fn get_user(&self, username: &str) -> AppResult<Option<Account>> {
        Ok(self.directory.find_one(username).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserDirectory;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_create_user_delegates_without_lookup() {
        let mut directory = MockUserDirectory::new();
        directory.expect_find_one().never();
        directory
            .expect_save()
            .with(eq(SignupRequest::new("alice", "p1")))
            .times(1)
            .returning(|req| Account::new(1, req.username, req.password));

        let service = AccountManager::new(Arc::new(directory));
        let account = service
            .create_user(SignupRequest::new("alice", "p1"))
            .await
            .unwrap();

        assert_eq!(account, Account::new(1, "alice", "p1"));
    }

    #[tokio::test]
    async fn test_get_user_found() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_one()
            .withf(|username| username == "alice")
            .returning(|username| Some(Account::new(4, username, "pw")));

        let service = AccountManager::new(Arc::new(directory));
        let account = service.get_user("alice").await.unwrap();

        assert_eq!(account.map(|a| a.id), Some(4));
    }

    #[tokio::test]
    async fn test_get_user_absent_is_not_an_error() {
        let mut directory = MockUserDirectory::new();
        directory.expect_find_one().returning(|_| None);

        let service = AccountManager::new(Arc::new(directory));
        let result = service.get_user("nobody").await;

        assert!(matches!(result, Ok(None)));
    }
}
