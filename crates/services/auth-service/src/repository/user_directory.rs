//! In-memory user directory.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use domain::{Account, SignupRequest, FIRST_ACCOUNT_ID};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User directory trait for dependency injection.
///
/// The directory does not enforce username uniqueness; duplicate
/// rejection is a business rule applied by the gateway's signup flow.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Append a new account and return it with its assigned id
    async fn save(&self, candidate: SignupRequest) -> Account;

    /// Find the first account (in insertion order) with this exact username
    async fn find_one(&self, username: &str) -> Option<Account>;

    /// Number of stored accounts
    async fn count(&self) -> usize;
}

/// Process-lifetime account store.
///
/// Starts empty; nothing is persisted, so a restart clears every account.
#[derive(Default)]
pub struct InMemoryDirectory {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn save(&self, candidate: SignupRequest) -> Account {
        // Id assignment and append happen under one write lock.
        let mut accounts = self.accounts.write().await;
        let id = FIRST_ACCOUNT_ID + accounts.len() as u64;
        let account = Account::new(id, candidate.username, candidate.password);
        accounts.push(account.clone());

        debug!(id, username = %account.username, "Saved account");
        account
    }

    async fn find_one(&self, username: &str) -> Option<Account> {
        let accounts = self.accounts.read().await;
        accounts
            .iter()
            .find(|account| account.username == username)
            .cloned()
    }

    async fn count(&self) -> usize {
        self.accounts.read().await.len()
    }
}
