//! Shared test helpers for tapline-core integration tests.
//!
//! Provides scripted sessions over [`ReplayTransport`] and a minimal HTTP
//! server that answers like an Appium endpoint.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use tapline_core::capabilities::{names, Capabilities};
use tapline_core::replay::ReplayTransport;
use tapline_core::report::MemoryReporter;
use tapline_core::session::Session;
use tapline_core::wire::Method;

// ---------------------------------------------------------------------------
// Scripted sessions
// ---------------------------------------------------------------------------

pub const SESSION_ID: &str = "replay-session";

/// Opens a session over a fresh replay transport for `platform_name`.
pub async fn replay_session(
    platform_name: &str,
) -> (Arc<ReplayTransport>, Arc<MemoryReporter>, Session) {
    let transport = Arc::new(ReplayTransport::new());
    transport.on_new_session(SESSION_ID, platform_name);
    let reporter = Arc::new(MemoryReporter::new());

    let mut caps = Capabilities::new();
    caps.set(names::PLATFORM_NAME, platform_name);
    let session = Session::open(transport.clone(), caps, reporter.clone())
        .await
        .unwrap();
    (transport, reporter, session)
}

/// Scripts the replies a successful element interaction needs.
pub fn script_element_ok(transport: &ReplayTransport, element_id: &str) {
    transport.on_element(element_id);
    transport
        .on(Method::Post, "/click", Value::Null)
        .on(Method::Post, "/clear", Value::Null)
        .on(Method::Post, "/value", Value::Null)
        .on(Method::Get, "/displayed", Value::Bool(true))
        .on(Method::Get, "/enabled", Value::Bool(true))
        .on(Method::Post, "/actions", Value::Null)
        .on(Method::Post, "/execute/sync", Value::Null);
}

/// Body of the last command sent to a path ending in `suffix`.
pub fn last_body(transport: &ReplayTransport, suffix: &str) -> Value {
    transport
        .commands_to(suffix)
        .last()
        .and_then(|c| c.body.clone())
        .unwrap_or(Value::Null)
}

// ---------------------------------------------------------------------------
// Mock HTTP server
// ---------------------------------------------------------------------------

/// A request captured by [`mock_appium`].
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Starts an HTTP server that answers requests in order with the given
/// `(status, body)` pairs and records every request it sees.
pub async fn mock_appium(responses: Vec<(u16, Value)>) -> (SocketAddr, Arc<Mutex<Vec<Captured>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let queue = Arc::new(Mutex::new(responses.into_iter()));

    let log = captured.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let log = log.clone();
            let queue = queue.clone();
            tokio::spawn(async move {
                serve_connection(stream, log, queue).await;
            });
        }
    });

    (addr, captured)
}

async fn serve_connection(
    mut stream: TcpStream,
    log: Arc<Mutex<Vec<Captured>>>,
    queue: Arc<Mutex<std::vec::IntoIter<(u16, Value)>>>,
) {
    loop {
        let Some(request) = read_request(&mut stream).await else {
            return;
        };
        log.lock().unwrap().push(request);

        let next = queue.lock().unwrap().next();
        let (status, body) = next.unwrap_or((500, serde_json::json!({
            "value": {"error": "unknown error", "message": "mock exhausted"}
        })));
        let body = body.to_string();
        let reply = format!(
            "HTTP/1.1 {status} MOCK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{body}",
            body.len()
        );
        if stream.write_all(reply.as_bytes()).await.is_err() {
            return;
        }
        let _ = stream.flush().await;
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<Captured> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(Captured {
        method,
        path,
        body: String::from_utf8_lossy(&body).to_string(),
    })
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
