//! Message-pattern dispatcher for the auth service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use common::{AppError, AppResult};
use domain::{SignupRequest, CREATE_USER_PATTERN, GET_USER_PATTERN};
use transport::{decode_payload, MessageHandler};

use crate::service::AccountService;

/// Routes inbound messages to the account service.
///
/// Performs no business validation; payloads are assumed to have been
/// validated before they were sent.
pub struct AuthDispatcher {
    service: Arc<dyn AccountService>,
}

impl AuthDispatcher {
    /// Create a new dispatcher.
    pub fn new(service: Arc<dyn AccountService>) -> Self {
        Self { service }
    }

    async fn handle_create_user(&self, data: Value) -> AppResult<Option<Value>> {
        let request: SignupRequest = decode_payload(data)?;
        let account = self.service.create_user(request).await?;
        Ok(Some(serde_json::to_value(account)?))
    }

    async fn handle_get_user(&self, data: Value) -> AppResult<Option<Value>> {
        // Only the username is consulted; the password rides along.
        let request: SignupRequest = decode_payload(data)?;
        let account = self.service.get_user(&request.username).await?;
        account
            .map(serde_json::to_value)
            .transpose()
            .map_err(AppError::from)
    }
}

#[async_trait]
impl MessageHandler for AuthDispatcher {
    async fn handle(&self, pattern: &str, data: Value) -> AppResult<Option<Value>> {
        debug!(pattern = %pattern, "Auth service received message");

        match pattern {
            CREATE_USER_PATTERN => self.handle_create_user(data).await,
            GET_USER_PATTERN => self.handle_get_user(data).await,
            other => Err(AppError::unknown_pattern(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryDirectory;
    use crate::service::AccountManager;
    use domain::Account;
    use serde_json::json;

    fn dispatcher() -> AuthDispatcher {
        let directory = Arc::new(InMemoryDirectory::new());
        AuthDispatcher::new(Arc::new(AccountManager::new(directory)))
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let dispatcher = dispatcher();
        let payload = json!({ "username": "alice", "password": "p1" });

        let created = dispatcher
            .handle(CREATE_USER_PATTERN, payload.clone())
            .await
            .unwrap()
            .unwrap();
        let account: Account = serde_json::from_value(created).unwrap();
        assert_eq!(account, Account::new(1, "alice", "p1"));

        let found = dispatcher.handle(GET_USER_PATTERN, payload).await.unwrap();
        assert_eq!(found, Some(serde_json::to_value(&account).unwrap()));
    }

    #[tokio::test]
    async fn test_get_user_ignores_password() {
        let dispatcher = dispatcher();
        dispatcher
            .handle(CREATE_USER_PATTERN, json!({ "username": "bob", "password": "right" }))
            .await
            .unwrap();

        let found = dispatcher
            .handle(GET_USER_PATTERN, json!({ "username": "bob", "password": "wrong" }))
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_get_unknown_user_replies_absent() {
        let found = dispatcher()
            .handle(GET_USER_PATTERN, json!({ "username": "ghost", "password": "x" }))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_unknown_pattern_is_an_error() {
        let result = dispatcher().handle("delete_user", json!({})).await;
        assert!(matches!(result, Err(AppError::UnknownPattern(ref p)) if p == "delete_user"));
    }

    #[tokio::test]
    async fn test_stringified_payload_is_accepted() {
        let payload = json!(r#"{"username":"carol","password":"pw"}"#);
        let created = dispatcher()
            .handle(CREATE_USER_PATTERN, payload)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created["username"], json!("carol"));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_rejected() {
        let result = dispatcher()
            .handle(CREATE_USER_PATTERN, json!({ "username": "dave" }))
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
