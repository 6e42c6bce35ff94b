//! TCP client for the message transport.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use common::{AppError, AppResult};

use crate::message::{decode_frame, encode_frame, ReplyEnvelope, RequestEnvelope};
use crate::MessageTransport;

/// Requests waiting for their reply, keyed by correlation id.
struct PendingReplies {
    /// False once the reader task has stopped
    open: bool,
    waiters: HashMap<String, oneshot::Sender<ReplyEnvelope>>,
}

type SharedPending = Arc<Mutex<PendingReplies>>;

/// One live TCP connection and its reader task.
struct Connection {
    writer: Mutex<OwnedWriteHalf>,
    pending: SharedPending,
    reader: JoinHandle<()>,
}

impl Connection {
    async fn open(endpoint: &str) -> AppResult<Arc<Self>> {
        let stream = TcpStream::connect(endpoint)
            .await
            .map_err(|e| AppError::transport(format!("failed to connect to {}: {}", endpoint, e)))?;
        let (read_half, write_half) = stream.into_split();

        let pending = Arc::new(Mutex::new(PendingReplies {
            open: true,
            waiters: HashMap::new(),
        }));
        let reader = tokio::spawn(read_replies(read_half, Arc::clone(&pending)));

        Ok(Arc::new(Self {
            writer: Mutex::new(write_half),
            pending,
            reader,
        }))
    }

    async fn is_open(&self) -> bool {
        self.pending.lock().await.open
    }

    async fn write_frame(&self, frame: &str) -> std::io::Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(frame.as_bytes()).await?;
        writer.flush().await
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Removes a waiter when its `send` future is dropped before the reply
/// arrives, e.g. when the caller's timeout fires.
struct WaiterGuard {
    pending: SharedPending,
    id: Option<String>,
}

impl WaiterGuard {
    fn new(pending: SharedPending, id: String) -> Self {
        Self {
            pending,
            id: Some(id),
        }
    }

    fn disarm(mut self) {
        self.id = None;
    }
}

impl Drop for WaiterGuard {
    fn drop(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };

        match self.pending.try_lock() {
            Ok(mut pending) => {
                pending.waiters.remove(&id);
            }
            Err(_) => {
                let pending = Arc::clone(&self.pending);
                if let Ok(runtime) = Handle::try_current() {
                    runtime.spawn(async move {
                        pending.lock().await.waiters.remove(&id);
                    });
                }
            }
        }
    }
}

/// Resolve pending requests as replies arrive.
///
/// When the connection ends every waiter is dropped, which fails the
/// corresponding `send` calls.
async fn read_replies(read_half: OwnedReadHalf, pending: SharedPending) {
    let mut lines = BufReader::new(read_half).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let reply = match decode_frame::<ReplyEnvelope>(trimmed) {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!(error = %e, "discarding malformed reply frame");
                        continue;
                    }
                };

                let waiter = pending.lock().await.waiters.remove(&reply.id);
                match waiter {
                    Some(tx) => {
                        let _ = tx.send(reply);
                    }
                    None => warn!(id = %reply.id, "received reply for unknown request id"),
                }
            }
            Ok(None) => {
                debug!("transport connection closed by peer");
                break;
            }
            Err(e) => {
                warn!(error = %e, "error reading from transport connection");
                break;
            }
        }
    }

    let mut pending = pending.lock().await;
    pending.open = false;
    pending.waiters.clear();
}

/// Message transport over a single, lazily opened TCP connection.
///
/// Concurrent calls share the connection and are told apart by their
/// correlation id. A dropped connection is reopened on the next call.
pub struct TcpTransport {
    endpoint: String,
    connection: Mutex<Option<Arc<Connection>>>,
}

impl TcpTransport {
    /// Create a client for the given `host:port`. Nothing is connected yet.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connection: Mutex::new(None),
        }
    }

    /// Remote address this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn connection(&self) -> AppResult<Arc<Connection>> {
        let mut slot = self.connection.lock().await;

        if let Some(connection) = slot.as_ref() {
            if connection.is_open().await {
                return Ok(Arc::clone(connection));
            }
        }

        debug!(endpoint = %self.endpoint, "Connecting to message transport");
        let connection = Connection::open(&self.endpoint).await?;
        *slot = Some(Arc::clone(&connection));
        Ok(connection)
    }

    /// Retire a connection whose write side is no longer trustworthy.
    ///
    /// A partial frame may already be on the wire, so nothing else is sent
    /// on it and its in-flight calls fail.
    async fn discard(&self, connection: &Arc<Connection>) {
        {
            let mut pending = connection.pending.lock().await;
            pending.open = false;
            pending.waiters.clear();
        }

        let mut slot = self.connection.lock().await;
        if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, connection)) {
            *slot = None;
        }
    }
}

#[async_trait]
impl MessageTransport for TcpTransport {
    async fn send(&self, pattern: &str, payload: Value) -> AppResult<Option<Value>> {
        let connection = self.connection().await?;
        let request = RequestEnvelope::new(pattern, payload);
        let frame = encode_frame(&request)?;

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = connection.pending.lock().await;
            if !pending.open {
                return Err(AppError::transport("connection closed"));
            }
            pending.waiters.insert(request.id.clone(), tx);
        }
        let guard = WaiterGuard::new(Arc::clone(&connection.pending), request.id.clone());

        trace!(pattern = %pattern, id = %request.id, "client -> service");

        if let Err(e) = connection.write_frame(&frame).await {
            warn!(endpoint = %self.endpoint, error = %e, "dropping connection after failed write");
            self.discard(&connection).await;
            return Err(AppError::transport(format!("failed to send request: {}", e)));
        }

        let reply = rx.await;
        guard.disarm();
        let reply =
            reply.map_err(|_| AppError::transport("connection closed before a reply arrived"))?;

        reply.into_result()
    }
}
