//! W3C WebDriver wire format.
//!
//! Every command sent to the automation server is a [`WireCommand`]: an HTTP
//! method, a path relative to the server root and an optional JSON body.
//! Every reply is a JSON object with a single `value` member. When `value`
//! is an object carrying an `error` member the server is reporting a failure.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tapline_core::wire::{decode_value, WireCommand};
//!
//! let cmd = WireCommand::post("/session/abc/element", json!({"using": "id", "value": "login"}));
//! assert_eq!(cmd.path, "/session/abc/element");
//!
//! let value = decode_value(json!({"value": "hello"})).unwrap();
//! assert_eq!(value, json!("hello"));
//! ```

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Key under which W3C servers return element references.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Key used by pre-W3C (JSONWP) servers for element references.
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while exchanging commands with the automation server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The request could not be delivered or the reply could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server did not answer within the transport timeout.
    #[error("request timed out")]
    Timeout,

    /// The reply was not a valid WebDriver response.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The server answered with a WebDriver error object.
    #[error("{error}: {message}")]
    Remote {
        /// The W3C error code, e.g. `no such element`.
        error: String,
        /// Human-readable message supplied by the server.
        message: String,
    },
}

impl WireError {
    /// Returns true if the server reported that no element matched a lookup.
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, WireError::Remote { error, .. } if error == "no such element")
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// HTTP method of a wire command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One WebDriver command, ready to be sent by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone, PartialEq)]
pub struct WireCommand {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the server root, always starting with `/`.
    pub path: String,
    /// JSON body for `POST` commands.
    pub body: Option<Value>,
}

impl WireCommand {
    /// Creates a `GET` command.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    /// Creates a `POST` command with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    /// Creates a `DELETE` command.
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Extracts the `value` member of a WebDriver reply.
///
/// Remote error objects are turned into [`WireError::Remote`].
pub fn decode_value(body: Value) -> Result<Value, WireError> {
    let mut map = match body {
        Value::Object(map) => map,
        other => {
            return Err(WireError::MalformedResponse(format!(
                "expected a JSON object, got {other}"
            )))
        }
    };
    let value = map
        .remove("value")
        .ok_or_else(|| WireError::MalformedResponse("missing `value` member".into()))?;

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(WireError::Remote {
            error: error.to_string(),
            message,
        });
    }
    Ok(value)
}

/// Reads an element id out of an element reference object.
pub fn element_id(value: &Value) -> Result<String, WireError> {
    value
        .get(ELEMENT_KEY)
        .or_else(|| value.get(LEGACY_ELEMENT_KEY))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| WireError::MalformedResponse(format!("not an element reference: {value}")))
}

/// Reads a string from a decoded value.
pub fn expect_string(value: Value) -> Result<String, WireError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(WireError::MalformedResponse(format!(
            "expected a string, got {other}"
        ))),
    }
}

/// Reads a string that the server may report as `null`.
pub fn optional_string(value: Value) -> Result<Option<String>, WireError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(WireError::MalformedResponse(format!(
            "expected a string or null, got {other}"
        ))),
    }
}

/// Reads a boolean from a decoded value.
pub fn expect_bool(value: Value) -> Result<bool, WireError> {
    value
        .as_bool()
        .ok_or_else(|| WireError::MalformedResponse(format!("expected a boolean, got {value}")))
}

/// A duration as whole milliseconds, saturating at `u64::MAX`.
pub fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
