//! Transport tests over real TCP sockets on localhost.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_test::{assert_err, assert_ok};

use common::{AppError, AppResult};
use transport::{serve, LocalTransport, MessageHandler, MessageTransport, TcpTransport};

/// Handler with one behaviour per pattern.
struct TestHandler;

#[async_trait]
impl MessageHandler for TestHandler {
    async fn handle(&self, pattern: &str, data: Value) -> AppResult<Option<Value>> {
        match pattern {
            "echo" => Ok(Some(data)),
            "missing" => Ok(None),
            "fail" => Err(AppError::bad_request("nope")),
            "slow" => {
                let delay = data["delay_ms"].as_u64().unwrap_or(0);
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(Some(data))
            }
            other => Err(AppError::unknown_pattern(other)),
        }
    }
}

async fn start_server() -> (String, JoinHandle<AppResult<()>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let handle = tokio::spawn(serve(listener, Arc::new(TestHandler)));
    (addr, handle)
}

#[tokio::test]
async fn test_round_trip() {
    let (addr, server) = start_server().await;
    let client = TcpTransport::new(addr);

    let reply = assert_ok!(client.send("echo", json!({ "username": "alice" })).await);
    assert_eq!(reply, Some(json!({ "username": "alice" })));

    server.abort();
}

#[tokio::test]
async fn test_absent_reply_is_not_an_error() {
    let (addr, server) = start_server().await;
    let client = TcpTransport::new(addr);

    let reply = assert_ok!(client.send("missing", json!({})).await);
    assert!(reply.is_none());

    server.abort();
}

#[tokio::test]
async fn test_handler_error_becomes_remote_error() {
    let (addr, server) = start_server().await;
    let client = TcpTransport::new(addr);

    let err = assert_err!(client.send("fail", json!({})).await);
    assert!(matches!(err, AppError::Remote(ref msg) if msg == "nope"));

    let err = assert_err!(client.send("no_such_pattern", json!({})).await);
    assert!(matches!(err, AppError::Remote(ref msg) if msg.contains("no matching message handler")));

    server.abort();
}

#[tokio::test]
async fn test_concurrent_calls_receive_their_own_replies() {
    let (addr, server) = start_server().await;
    let client = Arc::new(TcpTransport::new(addr));

    // Earlier requests sleep longer, so replies come back in reverse order.
    let calls = (0..16u64).map(|i| {
        let client = Arc::clone(&client);
        async move {
            let payload = json!({ "seq": i, "delay_ms": (16 - i) * 5 });
            let reply = client.send("slow", payload).await;
            (i, reply)
        }
    });

    for (i, reply) in futures::future::join_all(calls).await {
        let reply = reply.unwrap().unwrap();
        assert_eq!(reply["seq"], json!(i));
    }

    server.abort();
}

#[tokio::test]
async fn test_unreachable_service_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let client = TcpTransport::new(addr);
    let err = assert_err!(client.send("echo", json!({})).await);
    assert!(matches!(err, AppError::TransportFailure(_)));
}

#[tokio::test]
async fn test_dropped_connection_fails_pending_call() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    // Accept, read the request, then hang up without replying.
    let peer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 512];
        let _ = socket.read(&mut buf).await;
    });

    let client = TcpTransport::new(addr);
    let err = assert_err!(client.send("echo", json!({})).await);
    assert!(matches!(err, AppError::TransportFailure(_)));

    peer.await.unwrap();
}

#[tokio::test]
async fn test_reconnects_after_server_restart() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    // First peer hangs up immediately after reading.
    let first = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 512];
        let _ = socket.read(&mut buf).await;
        listener
    });

    let client = TcpTransport::new(addr.clone());
    assert_err!(client.send("echo", json!({})).await);

    // Serve properly on the same address.
    let listener = first.await.unwrap();
    let server = tokio::spawn(serve(listener, Arc::new(TestHandler)));

    let reply = assert_ok!(client.send("echo", json!({ "again": true })).await);
    assert_eq!(reply, Some(json!({ "again": true })));

    server.abort();
}

#[tokio::test]
async fn test_local_transport_matches_wire_semantics() {
    let client = LocalTransport::new(Arc::new(TestHandler));

    assert_eq!(
        assert_ok!(client.send("echo", json!(1)).await),
        Some(json!(1))
    );
    assert!(assert_ok!(client.send("missing", json!({})).await).is_none());

    let err = assert_err!(client.send("fail", json!({})).await);
    assert!(matches!(err, AppError::Remote(ref msg) if msg == "nope"));
}
