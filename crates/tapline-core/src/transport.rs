//! Transport layer between tapline and the automation server.
//!
//! [`Transport`] is the seam every session talks through. [`HttpTransport`]
//! is the production implementation: it sends each [`WireCommand`] as an
//! HTTP request to the automation server (Appium, Selenium Grid, or any W3C
//! WebDriver endpoint) and decodes the reply with [`decode_value`].
//!
//! # Example
//!
//! ```no_run
//! use tapline_core::transport::{HttpTransport, Transport};
//! use tapline_core::wire::WireCommand;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new("http://127.0.0.1:4723")?;
//! let status = transport.send(&WireCommand::get("/status")).await?;
//! println!("{status}");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, debug_span, trace, Instrument};

use crate::wire::{decode_value, Method, WireCommand, WireError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Timeout for establishing the TCP connection to the server.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for a whole request. Session creation may boot an emulator, so
/// this is generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

// ---------------------------------------------------------------------------
// Transport trait
// ---------------------------------------------------------------------------

/// Delivers wire commands to an automation server.
///
/// Implementations return the decoded `value` member of the reply, or a
/// [`WireError`] when delivery failed or the server reported an error.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one command and waits for its reply.
    async fn send(&self, command: &WireCommand) -> Result<Value, WireError>;
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// A [`Transport`] speaking HTTP to a WebDriver endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    /// Creates a transport for the server at `base_url`.
    ///
    /// The URL may carry a path prefix (e.g. `http://host:4444/wd/hub`);
    /// command paths are appended to it.
    pub fn new(base_url: &str) -> Result<Self, WireError> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| WireError::Transport(format!("invalid server URL `{base_url}`: {e}")))?;
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WireError::Transport(e.to_string()))?;
        Ok(Self { client, base })
    }

    /// The server root this transport targets.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> WireError {
    if err.is_timeout() {
        WireError::Timeout
    } else {
        WireError::Transport(err.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, command: &WireCommand) -> Result<Value, WireError> {
        let span = debug_span!("wire_send", method = %command.method, path = %command.path);
        async {
            let url = self.url_for(&command.path);
            let request = match command.method {
                Method::Get => self.client.get(&url),
                Method::Delete => self.client.delete(&url),
                Method::Post => self
                    .client
                    .post(&url)
                    .json(command.body.as_ref().unwrap_or(&Value::Object(Default::default()))),
            };

            let response = request.send().await.map_err(map_reqwest_error)?;
            let status = response.status();
            let text = response.text().await.map_err(map_reqwest_error)?;
            trace!(%status, body_bytes = text.len(), "reply received");

            let body: Value = match serde_json::from_str(&text) {
                Ok(body) => body,
                Err(e) if status.is_success() => {
                    return Err(WireError::MalformedResponse(e.to_string()));
                }
                Err(_) => {
                    return Err(WireError::Transport(format!("HTTP {status}: {text}")));
                }
            };

            // Error statuses normally carry a W3C error object; surface it.
            let decoded = decode_value(body);
            if !status.is_success() {
                return match decoded {
                    Err(remote @ WireError::Remote { .. }) => Err(remote),
                    _ => Err(WireError::Transport(format!("HTTP {status}"))),
                };
            }
            debug!("command ok");
            decoded
        }
        .instrument(span)
        .await
    }
}
