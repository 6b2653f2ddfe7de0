//! Automation sessions.
//!
//! A [`Session`] is the handle to one live session on the automation server,
//! controlling one device/app instance. It is created by
//! [`Session::open`] (usually through the [`DriverFactory`](crate::driver::DriverFactory))
//! and ends with [`Session::quit`].
//!
//! When the session is opened the platform reported by the server decides
//! which [`DeviceControls`] the session carries. Platform-specific operations
//! (rotation, backgrounding, power state) go through those controls, so the
//! platform is resolved once rather than checked on every call.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tapline_core::capabilities::{names, Capabilities};
//! use tapline_core::locator::Locator;
//! use tapline_core::report::TracingReporter;
//! use tapline_core::session::Session;
//! use tapline_core::transport::HttpTransport;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(HttpTransport::new("http://127.0.0.1:4723")?);
//! let mut caps = Capabilities::new();
//! caps.set(names::PLATFORM_NAME, "ANDROID")
//!     .set(names::AUTOMATION_NAME, "UiAutomator2");
//!
//! let session = Session::open(transport, caps, Arc::new(TracingReporter)).await?;
//! session.find_element(&Locator::accessibility_id("test-LOGIN")).await?.click().await?;
//! session.quit().await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::capabilities::{names, Capabilities};
use crate::controls::{
    AndroidControls, DeviceControls, GenericControls, IosControls, Orientation, PowerState,
};
use crate::element::{Element, Rect};
use crate::error::DriverError;
use crate::gesture::{actions_request, ActionSequence};
use crate::locator::Locator;
use crate::report::Reporter;
use crate::transport::Transport;
use crate::wire::{element_id, expect_string, millis, WireCommand, WireError};

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Platform family of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    /// Any other platform name reported by the server.
    Other(String),
}

impl Platform {
    /// Parses a `platformName` capability value, ignoring case.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("android") {
            Platform::Android
        } else if name.eq_ignore_ascii_case("ios") {
            Platform::Ios
        } else {
            Platform::Other(name.to_string())
        }
    }

    /// The `platformName` value sent in capabilities.
    pub fn name(&self) -> &str {
        match self {
            Platform::Android => "ANDROID",
            Platform::Ios => "IOS",
            Platform::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// Session-scoped command sender.
///
/// Prefixes every path with `/session/{id}`.
#[derive(Clone)]
pub struct Endpoint {
    session_id: String,
    transport: Arc<dyn Transport>,
}

impl Endpoint {
    pub fn new(session_id: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            session_id: session_id.into(),
            transport,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    fn path(&self, suffix: &str) -> String {
        format!("/session/{}{suffix}", self.session_id)
    }

    pub async fn get(&self, suffix: &str) -> Result<Value, WireError> {
        self.transport.send(&WireCommand::get(self.path(suffix))).await
    }

    pub async fn post(&self, suffix: &str, body: Value) -> Result<Value, WireError> {
        self.transport
            .send(&WireCommand::post(self.path(suffix), body))
            .await
    }

    pub async fn delete(&self, suffix: &str) -> Result<Value, WireError> {
        self.transport.send(&WireCommand::delete(self.path(suffix))).await
    }

    /// Finds one element by raw strategy and returns its id.
    pub async fn find_element_id(&self, using: &str, value: &str) -> Result<String, WireError> {
        let reply = self
            .post("/element", json!({"using": using, "value": value}))
            .await?;
        element_id(&reply)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Explicit wait used by screens unless the session is given another.
pub const DEFAULT_EXPLICIT_WAIT: Duration = Duration::from_secs(10);

/// A live automation session.
pub struct Session {
    endpoint: Endpoint,
    platform: Platform,
    capabilities: Value,
    controls: Box<dyn DeviceControls>,
    reporter: Arc<dyn Reporter>,
    explicit_wait: Duration,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.endpoint.session_id)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

fn controls_for(platform: &Platform) -> Box<dyn DeviceControls> {
    match platform {
        Platform::Android => Box::new(AndroidControls),
        Platform::Ios => Box::new(IosControls),
        Platform::Other(_) => Box::new(GenericControls),
    }
}

impl Session {
    /// Opens a new session with the given capabilities.
    #[instrument(skip_all)]
    pub async fn open(
        transport: Arc<dyn Transport>,
        capabilities: Capabilities,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, DriverError> {
        let requested_platform = capabilities
            .get_str(names::PLATFORM_NAME)
            .map(str::to_string);
        let reply = transport
            .send(&WireCommand::post("/session", capabilities.to_session_request()))
            .await?;

        let session_id = reply
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| WireError::MalformedResponse("new session reply has no sessionId".into()))?
            .to_string();
        let negotiated = reply.get("capabilities").cloned().unwrap_or(Value::Null);

        let platform_name = negotiated
            .get(names::PLATFORM_NAME)
            .and_then(Value::as_str)
            .map(str::to_string)
            .or(requested_platform)
            .unwrap_or_default();
        let platform = Platform::from_name(&platform_name);

        info!(session_id = %session_id, platform = %platform, "session opened");
        Ok(Self::from_parts(
            Endpoint::new(session_id, transport),
            platform,
            negotiated,
            reporter,
        ))
    }

    /// Assembles a session for an id that already exists on the server.
    pub fn from_parts(
        endpoint: Endpoint,
        platform: Platform,
        capabilities: Value,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        let controls = controls_for(&platform);
        Self {
            endpoint,
            platform,
            capabilities,
            controls,
            reporter,
            explicit_wait: DEFAULT_EXPLICIT_WAIT,
        }
    }

    /// Sets the explicit wait screens on this session start with.
    pub fn with_explicit_wait(mut self, timeout: Duration) -> Self {
        self.explicit_wait = timeout;
        self
    }

    pub fn explicit_wait(&self) -> Duration {
        self.explicit_wait
    }

    pub fn id(&self) -> &str {
        self.endpoint.session_id()
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Capabilities negotiated by the server.
    pub fn capabilities(&self) -> &Value {
        &self.capabilities
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn reporter(&self) -> &Arc<dyn Reporter> {
        &self.reporter
    }

    /// The platform controls resolved when the session was opened.
    pub fn controls(&self) -> &dyn DeviceControls {
        self.controls.as_ref()
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Finds the first element matching `locator`.
    pub async fn find_element(&self, locator: &Locator) -> Result<Element<'_>, DriverError> {
        debug!(%locator, "find element");
        match self.endpoint.post("/element", locator.to_query()).await {
            Ok(reply) => Ok(Element::new(self, element_id(&reply)?)),
            Err(err) if err.is_no_such_element() => {
                Err(DriverError::NoSuchElement(locator.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Finds all elements matching `locator`.
    pub async fn find_elements(&self, locator: &Locator) -> Result<Vec<Element<'_>>, DriverError> {
        let reply = self.endpoint.post("/elements", locator.to_query()).await?;
        let items = reply.as_array().ok_or_else(|| {
            WireError::MalformedResponse(format!("expected an element list, got {reply}"))
        })?;
        items
            .iter()
            .map(|item| {
                element_id(item)
                    .map(|id| Element::new(self, id))
                    .map_err(DriverError::from)
            })
            .collect()
    }

    /// The element that currently has focus.
    pub async fn active_element(&self) -> Result<Element<'_>, DriverError> {
        let reply = self.endpoint.get("/element/active").await?;
        Ok(Element::new(self, element_id(&reply)?))
    }

    // -----------------------------------------------------------------------
    // Session-wide commands
    // -----------------------------------------------------------------------

    pub async fn page_source(&self) -> Result<String, DriverError> {
        let value = self.endpoint.get("/source").await?;
        Ok(expect_string(value)?)
    }

    /// Server status (`GET /status`).
    pub async fn status(&self) -> Result<Value, DriverError> {
        Ok(self.endpoint.transport().send(&WireCommand::get("/status")).await?)
    }

    /// Runs a script (or an Appium `mobile:` command) synchronously.
    ///
    /// `args` is sent as the argument list; pass `Value::Null` for none.
    pub async fn execute_script(&self, script: &str, args: Value) -> Result<Value, DriverError> {
        let args = match args {
            Value::Null => json!([]),
            Value::Array(_) => args,
            single => json!([single]),
        };
        Ok(self
            .endpoint
            .post("/execute/sync", json!({"script": script, "args": args}))
            .await?)
    }

    /// Performs pointer action sequences.
    pub async fn perform_actions(&self, sequences: &[ActionSequence]) -> Result<(), DriverError> {
        self.endpoint.post("/actions", actions_request(sequences)).await?;
        Ok(())
    }

    /// Releases all pressed keys and pointers.
    pub async fn release_actions(&self) -> Result<(), DriverError> {
        self.endpoint.delete("/actions").await?;
        Ok(())
    }

    /// Current window size as `(width, height)`.
    pub async fn window_size(&self) -> Result<(i32, i32), DriverError> {
        let value = self.endpoint.get("/window/rect").await?;
        let rect: Rect = serde_json::from_value(value)
            .map_err(|e| WireError::MalformedResponse(e.to_string()))?;
        Ok((rect.width as i32, rect.height as i32))
    }

    pub async fn set_page_load_timeout(&self, timeout: Duration) -> Result<(), DriverError> {
        self.endpoint
            .post("/timeouts", json!({"pageLoad": millis(timeout)}))
            .await?;
        Ok(())
    }

    pub async fn set_implicit_wait(&self, timeout: Duration) -> Result<(), DriverError> {
        self.endpoint
            .post("/timeouts", json!({"implicit": millis(timeout)}))
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Platform controls
    // -----------------------------------------------------------------------

    pub async fn rotate(&self, orientation: Orientation) -> Result<(), DriverError> {
        self.controls.rotate(self, orientation).await
    }

    pub async fn background_app(&self, duration: Duration) -> Result<(), DriverError> {
        self.controls.background_app(self, duration).await
    }

    pub async fn hide_keyboard(&self) -> Result<(), DriverError> {
        self.controls.hide_keyboard(self).await
    }

    pub async fn set_power_ac(&self, state: PowerState) -> Result<(), DriverError> {
        self.controls.set_power_ac(self, state).await
    }

    pub async fn scroll_into_view_and_click(
        &self,
        scrollable_list_id: &str,
        text: &str,
    ) -> Result<(), DriverError> {
        self.controls
            .scroll_into_view_and_click(self, scrollable_list_id, text)
            .await
    }

    /// Ends the session on the server.
    ///
    /// Element handles from this session become invalid.
    pub async fn quit(&self) -> Result<(), DriverError> {
        self.endpoint.delete("").await?;
        info!(session_id = %self.id(), "session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_from_name_ignores_case() {
        assert_eq!(Platform::from_name("Android"), Platform::Android);
        assert_eq!(Platform::from_name("IOS"), Platform::Ios);
        assert_eq!(Platform::from_name("iOS"), Platform::Ios);
        assert_eq!(
            Platform::from_name("Windows"),
            Platform::Other("Windows".into())
        );
    }

    #[test]
    fn platform_names() {
        assert_eq!(Platform::Android.name(), "ANDROID");
        assert_eq!(Platform::Ios.to_string(), "IOS");
    }
}
