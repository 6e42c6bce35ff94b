//! Message transport client for auth-service.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use common::{AppError, AppResult};
use domain::{Account, SignupRequest, CREATE_USER_PATTERN, GET_USER_PATTERN};
use transport::{MessageTransport, TcpTransport};

/// Client wrapper for the auth-service message patterns.
///
/// Without a timeout a call waits for as long as the transport does. With
/// one, expiry is reported as `AppError::TransportTimeout`, never as an
/// absent account.
pub struct AuthClient {
    transport: Arc<dyn MessageTransport>,
    timeout: Option<Duration>,
}

impl AuthClient {
    /// Create a client over any transport.
    pub fn new(transport: Arc<dyn MessageTransport>) -> Self {
        Self {
            transport,
            timeout: None,
        }
    }

    /// Create a TCP client for auth-service. The connection opens on first use.
    pub fn connect(endpoint: &str) -> Self {
        debug!("Using auth-service at {}", endpoint);
        Self::new(Arc::new(TcpTransport::new(endpoint)))
    }

    /// Bound every call by `timeout` (None = wait indefinitely).
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Look up an account by username (`get_user`).
    pub async fn get_user(&self, request: &SignupRequest) -> AppResult<Option<Account>> {
        let reply = self.send(GET_USER_PATTERN, request).await?;

        reply
            .map(serde_json::from_value)
            .transpose()
            .map_err(AppError::from)
    }

    /// Create an account (`create_user`).
    pub async fn create_user(&self, request: &SignupRequest) -> AppResult<Account> {
        let reply = self
            .send(CREATE_USER_PATTERN, request)
            .await?
            .ok_or_else(|| AppError::internal("auth-service returned no account for create_user"))?;

        Ok(serde_json::from_value(reply)?)
    }

    async fn send(&self, pattern: &str, request: &SignupRequest) -> AppResult<Option<Value>> {
        let payload = serde_json::to_value(request)?;
        let call = self.transport.send(pattern, payload);

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| AppError::TransportTimeout(limit.as_millis() as u64))?,
            None => call.await,
        }
    }
}
