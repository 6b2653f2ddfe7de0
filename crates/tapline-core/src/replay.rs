//! Scripted transport for offline runs.
//!
//! [`ReplayTransport`] answers wire commands from a script instead of a live
//! server and records every command it receives. It backs dry runs of page
//! flows and the test suites of crates built on tapline.
//!
//! Routes match on the method plus a path suffix, so scripts do not need to
//! know the session id. Each route holds a queue of replies; the last reply
//! of a queue is repeated for any further matching command.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tapline_core::replay::ReplayTransport;
//! use tapline_core::transport::Transport;
//! use tapline_core::wire::{Method, WireCommand};
//!
//! # tokio_test_block(async {
//! let transport = ReplayTransport::new();
//! transport.on(Method::Get, "/source", json!("<hierarchy/>"));
//!
//! let value = transport.send(&WireCommand::get("/session/s1/source")).await.unwrap();
//! assert_eq!(value, json!("<hierarchy/>"));
//! assert_eq!(transport.commands().len(), 1);
//! # });
//! # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::transport::Transport;
use crate::wire::{Method, WireCommand, WireError, ELEMENT_KEY};

struct Route {
    method: Method,
    suffix: String,
    replies: VecDeque<Result<Value, WireError>>,
}

impl Route {
    fn matches(&self, command: &WireCommand) -> bool {
        self.method == command.method && command.path.ends_with(&self.suffix)
    }

    fn next_reply(&mut self) -> Option<Result<Value, WireError>> {
        if self.replies.len() > 1 {
            self.replies.pop_front()
        } else {
            self.replies.front().cloned()
        }
    }
}

/// A [`Transport`] that replays scripted replies.
#[derive(Default)]
pub struct ReplayTransport {
    routes: Mutex<Vec<Route>>,
    log: Mutex<Vec<WireCommand>>,
}

impl ReplayTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, suffix: &str, reply: Result<Value, WireError>) -> &Self {
        if let Ok(mut routes) = self.routes.lock() {
            match routes
                .iter_mut()
                .find(|r| r.method == method && r.suffix == suffix)
            {
                Some(route) => route.replies.push_back(reply),
                None => routes.push(Route {
                    method,
                    suffix: suffix.to_string(),
                    replies: VecDeque::from([reply]),
                }),
            }
        }
        self
    }

    /// Scripts a successful reply for commands ending in `suffix`.
    pub fn on(&self, method: Method, suffix: &str, value: Value) -> &Self {
        self.push(method, suffix, Ok(value))
    }

    /// Scripts a W3C error reply.
    pub fn on_error(&self, method: Method, suffix: &str, error: &str, message: &str) -> &Self {
        self.push(
            method,
            suffix,
            Err(WireError::Remote {
                error: error.to_string(),
                message: message.to_string(),
            }),
        )
    }

    /// Scripts a new-session reply.
    pub fn on_new_session(&self, session_id: &str, platform_name: &str) -> &Self {
        self.on(
            Method::Post,
            "/session",
            json!({
                "sessionId": session_id,
                "capabilities": {"platformName": platform_name},
            }),
        )
    }

    /// Scripts an element lookup reply carrying `element_id`.
    pub fn on_element(&self, element_id: &str) -> &Self {
        self.on(Method::Post, "/element", json!({ ELEMENT_KEY: element_id }))
    }

    /// Every command received so far, in order.
    pub fn commands(&self) -> Vec<WireCommand> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Paths of every command received so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.commands().into_iter().map(|c| c.path).collect()
    }

    /// Commands whose path ends in `suffix`.
    pub fn commands_to(&self, suffix: &str) -> Vec<WireCommand> {
        self.commands()
            .into_iter()
            .filter(|c| c.path.ends_with(suffix))
            .collect()
    }
}

#[async_trait]
impl Transport for ReplayTransport {
    async fn send(&self, command: &WireCommand) -> Result<Value, WireError> {
        if let Ok(mut log) = self.log.lock() {
            log.push(command.clone());
        }
        let mut routes = self
            .routes
            .lock()
            .map_err(|_| WireError::Transport("replay script poisoned".into()))?;
        // Longest suffix first so `/element/e1/click` beats `/click`.
        let route = routes
            .iter_mut()
            .filter(|r| r.matches(command))
            .max_by_key(|r| r.suffix.len());
        match route.and_then(|r| r.next_reply()) {
            Some(reply) => reply,
            None => Err(WireError::Remote {
                error: "unknown command".into(),
                message: format!("no scripted reply for {} {}", command.method, command.path),
            }),
        }
    }
}
