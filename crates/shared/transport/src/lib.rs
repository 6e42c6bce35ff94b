//! Message-pattern transport shared by the gateway and the auth service.
//!
//! Requests are routed by a string pattern (e.g. `create_user`) and each
//! request resolves exactly one correlated reply. A reply may carry an
//! absent payload, which callers treat as "not found", distinct from an
//! error.
//!
//! This crate provides:
//! - The wire envelopes and newline-delimited JSON framing
//! - `TcpTransport`: a lazily connected client with request correlation
//! - `serve`: the accept loop that feeds inbound messages to a handler
//! - `LocalTransport`: an in-process transport with the same semantics

pub mod client;
pub mod local;
pub mod message;
pub mod server;

use async_trait::async_trait;
use serde_json::Value;

use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub use client::TcpTransport;
pub use local::LocalTransport;
pub use message::{decode_payload, ReplyEnvelope, RequestEnvelope};
pub use server::serve;

/// Client side of the message transport.
///
/// `Ok(None)` is a successful reply without a payload. Transport problems
/// surface as `AppError::TransportFailure`, error replies from the remote
/// handler as `AppError::Remote`. No timeout is applied here.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Send a message and wait for its correlated reply
    async fn send(&self, pattern: &str, payload: Value) -> AppResult<Option<Value>>;
}

/// Server side of the message transport: routes one inbound message.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle a message; the result becomes the correlated reply
    async fn handle(&self, pattern: &str, data: Value) -> AppResult<Option<Value>>;
}
