//! TCP server loop for the message transport.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use common::{AppError, AppResult};

use crate::message::{decode_frame, encode_frame, ReplyEnvelope, RequestEnvelope};
use crate::MessageHandler;

/// Accept connections forever and dispatch every inbound message to `handler`.
pub async fn serve(listener: TcpListener, handler: Arc<dyn MessageHandler>) -> AppResult<()> {
    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .map_err(|e| AppError::transport(format!("failed to accept connection: {}", e)))?;
        debug!(%peer, "Accepted transport connection");

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, handler).await {
                warn!(%peer, error = %e, "transport connection ended with error");
            }
        });
    }
}

/// Read request frames until the peer hangs up.
///
/// Each request runs on its own task so a slow handler does not hold back
/// other requests in flight on the same connection.
async fn handle_connection(
    stream: TcpStream,
    handler: Arc<dyn MessageHandler>,
) -> std::io::Result<()> {
    let (read_half, write_half) = stream.into_split();
    let writer = Arc::new(Mutex::new(write_half));
    let mut lines = BufReader::new(read_half).lines();

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let request = match decode_frame::<RequestEnvelope>(trimmed) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "discarding malformed request frame");
                continue;
            }
        };

        let handler = Arc::clone(&handler);
        let writer = Arc::clone(&writer);
        tokio::spawn(async move {
            let RequestEnvelope { id, pattern, data } = request;
            debug!(pattern = %pattern, id = %id, "Dispatching message");

            let result = handler.handle(&pattern, data).await;
            write_reply(&writer, ReplyEnvelope::from_result(id, result)).await;
        });
    }

    debug!("transport connection closed by peer");
    Ok(())
}

async fn write_reply(writer: &Mutex<OwnedWriteHalf>, reply: ReplyEnvelope) {
    let frame = match encode_frame(&reply) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(id = %reply.id, error = %e, "failed to encode reply");
            return;
        }
    };

    let mut writer = writer.lock().await;
    if let Err(e) = writer.write_all(frame.as_bytes()).await {
        warn!(id = %reply.id, error = %e, "failed to write reply");
    }
}
