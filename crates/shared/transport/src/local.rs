//! In-process transport.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use common::AppResult;

use crate::message::{ReplyEnvelope, RequestEnvelope};
use crate::{MessageHandler, MessageTransport};

/// Delivers messages straight to a handler in the same process.
///
/// Results go through the same reply envelope as the TCP transport, so a
/// handler error reaches the caller as `AppError::Remote`.
pub struct LocalTransport {
    handler: Arc<dyn MessageHandler>,
}

impl LocalTransport {
    pub fn new(handler: Arc<dyn MessageHandler>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl MessageTransport for LocalTransport {
    async fn send(&self, pattern: &str, payload: Value) -> AppResult<Option<Value>> {
        let request = RequestEnvelope::new(pattern, payload);
        let result = self.handler.handle(&request.pattern, request.data).await;

        ReplyEnvelope::from_result(request.id, result).into_result()
    }
}
