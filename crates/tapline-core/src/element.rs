//! Element handles.
//!
//! An [`Element`] is a server-side reference to one located UI node. It
//! borrows the [`Session`] that found it and stays valid only until the
//! screen node goes away (e.g. after navigation); using a stale element
//! returns the server's `stale element reference` error.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::DriverError;
use crate::session::Session;
use crate::wire::{expect_bool, expect_string, optional_string};

/// Keystroke sent to submit a field (W3C `Enter` key).
pub const ENTER_KEY: char = '\u{E007}';

/// Position and size of an element in screen coordinates.
///
/// The origin is the top-left corner of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Centre point, truncated to whole pixels.
    pub fn center(&self) -> (i32, i32) {
        (
            (self.x + self.width / 2.0) as i32,
            (self.y + self.height / 2.0) as i32,
        )
    }
}

/// A located UI element.
#[derive(Debug, Clone)]
pub struct Element<'s> {
    session: &'s Session,
    id: String,
}

impl<'s> Element<'s> {
    pub(crate) fn new(session: &'s Session, id: String) -> Self {
        Self { session, id }
    }

    /// The server-assigned element id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The session this element belongs to.
    pub fn session(&self) -> &'s Session {
        self.session
    }

    fn path(&self, command: &str) -> String {
        format!("/element/{}/{command}", self.id)
    }

    pub async fn click(&self) -> Result<(), DriverError> {
        self.session.endpoint().post(&self.path("click"), json!({})).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), DriverError> {
        self.session.endpoint().post(&self.path("clear"), json!({})).await?;
        Ok(())
    }

    /// Types `text` into the element.
    pub async fn send_keys(&self, text: &str) -> Result<(), DriverError> {
        let chars: Vec<String> = text.chars().map(String::from).collect();
        self.session
            .endpoint()
            .post(&self.path("value"), json!({"text": text, "value": chars}))
            .await?;
        Ok(())
    }

    /// The visible text of the element.
    pub async fn text(&self) -> Result<String, DriverError> {
        let value = self.session.endpoint().get(&self.path("text")).await?;
        Ok(expect_string(value)?)
    }

    /// Reads an attribute; `None` when the element does not carry it.
    pub async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError> {
        let value = self
            .session
            .endpoint()
            .get(&self.path(&format!("attribute/{name}")))
            .await?;
        Ok(optional_string(value)?)
    }

    pub async fn is_enabled(&self) -> Result<bool, DriverError> {
        let value = self.session.endpoint().get(&self.path("enabled")).await?;
        Ok(expect_bool(value)?)
    }

    pub async fn is_selected(&self) -> Result<bool, DriverError> {
        let value = self.session.endpoint().get(&self.path("selected")).await?;
        Ok(expect_bool(value)?)
    }

    pub async fn is_displayed(&self) -> Result<bool, DriverError> {
        let value = self.session.endpoint().get(&self.path("displayed")).await?;
        Ok(expect_bool(value)?)
    }

    pub async fn rect(&self) -> Result<Rect, DriverError> {
        let value = self.session.endpoint().get(&self.path("rect")).await?;
        serde_json::from_value(value).map_err(|e| {
            DriverError::Wire(crate::wire::WireError::MalformedResponse(e.to_string()))
        })
    }

    /// Centre of the element in screen coordinates.
    pub async fn center(&self) -> Result<(i32, i32), DriverError> {
        Ok(self.rect().await?.center())
    }
}

impl std::fmt::Display for Element<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "element {}", self.id)
    }
}
