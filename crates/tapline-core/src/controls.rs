//! Platform-specific device controls.
//!
//! Each [`Session`] carries one [`DeviceControls`] implementation, picked
//! from the negotiated platform when the session opens:
//!
//! | platform | controls            | rotate | background | keyboard | power AC | UiScrollable |
//! |----------|---------------------|--------|------------|----------|----------|--------------|
//! | Android  | [`AndroidControls`] | yes    | yes        | yes      | yes      | yes          |
//! | iOS      | [`IosControls`]     | yes    | yes        | yes      | no       | no           |
//! | other    | [`GenericControls`] | no     | script     | script   | no       | no           |
//!
//! Operations a platform lacks return [`DriverError::Unsupported`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::error::DriverError;
use crate::session::Session;

/// Screen orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Portrait => "PORTRAIT",
            Orientation::Landscape => "LANDSCAPE",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Android AC power state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    fn as_wire(self) -> &'static str {
        match self {
            PowerState::On => "on",
            PowerState::Off => "off",
        }
    }
}

impl FromStr for PowerState {
    type Err = DriverError;

    /// Accepts exactly `ON` and `OFF`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ON" => Ok(PowerState::On),
            "OFF" => Ok(PowerState::Off),
            other => Err(DriverError::InvalidArgument(format!(
                "unknown power state `{other}`"
            ))),
        }
    }
}

fn unsupported(operation: &'static str, session: &Session) -> DriverError {
    DriverError::Unsupported {
        operation,
        platform: session.platform().to_string(),
    }
}

/// Operations whose availability depends on the platform.
#[async_trait]
pub trait DeviceControls: Send + Sync {
    async fn rotate(&self, session: &Session, orientation: Orientation) -> Result<(), DriverError>;

    /// Sends the app to the background for `duration`, then restores it.
    async fn background_app(&self, session: &Session, duration: Duration) -> Result<(), DriverError>;

    async fn hide_keyboard(&self, session: &Session) -> Result<(), DriverError>;

    async fn set_power_ac(&self, session: &Session, state: PowerState) -> Result<(), DriverError> {
        let _ = state;
        Err(unsupported("set_power_ac", session))
    }

    /// Scrolls a horizontal list until `text` is visible, then clicks it.
    async fn scroll_into_view_and_click(
        &self,
        session: &Session,
        scrollable_list_id: &str,
        text: &str,
    ) -> Result<(), DriverError> {
        let _ = (scrollable_list_id, text);
        Err(unsupported("scroll_into_view_and_click", session))
    }

    /// Whether [`set_power_ac`](Self::set_power_ac) is available.
    fn supports_power_ac(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Shared Appium endpoints
// ---------------------------------------------------------------------------

async fn appium_rotate(session: &Session, orientation: Orientation) -> Result<(), DriverError> {
    session
        .endpoint()
        .post("/orientation", json!({"orientation": orientation.as_str()}))
        .await?;
    Ok(())
}

async fn appium_background(session: &Session, duration: Duration) -> Result<(), DriverError> {
    session
        .endpoint()
        .post("/appium/app/background", json!({"seconds": duration.as_secs()}))
        .await?;
    Ok(())
}

async fn appium_hide_keyboard(session: &Session) -> Result<(), DriverError> {
    session
        .endpoint()
        .post("/appium/device/hide_keyboard", json!({}))
        .await?;
    Ok(())
}

/// Builds the UiAutomator expression used by [`AndroidControls::scroll_into_view_and_click`].
pub fn ui_scrollable_expression(scrollable_list_id: &str, text: &str) -> String {
    format!(
        "new UiScrollable(new UiSelector().scrollable(true).resourceId(\"{scrollable_list_id}\"))\
         .setAsHorizontalList().scrollIntoView(new UiSelector().text(\"{text}\"))"
    )
}

// ---------------------------------------------------------------------------
// Implementations
// ---------------------------------------------------------------------------

/// Controls for UiAutomator2 sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct AndroidControls;

#[async_trait]
impl DeviceControls for AndroidControls {
    async fn rotate(&self, session: &Session, orientation: Orientation) -> Result<(), DriverError> {
        appium_rotate(session, orientation).await
    }

    async fn background_app(&self, session: &Session, duration: Duration) -> Result<(), DriverError> {
        appium_background(session, duration).await
    }

    async fn hide_keyboard(&self, session: &Session) -> Result<(), DriverError> {
        appium_hide_keyboard(session).await
    }

    async fn set_power_ac(&self, session: &Session, state: PowerState) -> Result<(), DriverError> {
        session
            .endpoint()
            .post("/appium/device/power_ac", json!({"state": state.as_wire()}))
            .await?;
        Ok(())
    }

    async fn scroll_into_view_and_click(
        &self,
        session: &Session,
        scrollable_list_id: &str,
        text: &str,
    ) -> Result<(), DriverError> {
        let expression = ui_scrollable_expression(scrollable_list_id, text);
        let id = session
            .endpoint()
            .find_element_id("-android uiautomator", &expression)
            .await?;
        session
            .endpoint()
            .post(&format!("/element/{id}/click"), json!({}))
            .await?;
        Ok(())
    }

    fn supports_power_ac(&self) -> bool {
        true
    }
}

/// Controls for XCUITest sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct IosControls;

#[async_trait]
impl DeviceControls for IosControls {
    async fn rotate(&self, session: &Session, orientation: Orientation) -> Result<(), DriverError> {
        appium_rotate(session, orientation).await
    }

    async fn background_app(&self, session: &Session, duration: Duration) -> Result<(), DriverError> {
        appium_background(session, duration).await
    }

    async fn hide_keyboard(&self, session: &Session) -> Result<(), DriverError> {
        appium_hide_keyboard(session).await
    }
}

/// Fallback controls for platforms without dedicated endpoints.
///
/// Backgrounding and keyboard dismissal go through `mobile:` scripts.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericControls;

#[async_trait]
impl DeviceControls for GenericControls {
    async fn rotate(&self, session: &Session, orientation: Orientation) -> Result<(), DriverError> {
        let _ = orientation;
        Err(unsupported("rotate", session))
    }

    async fn background_app(&self, session: &Session, duration: Duration) -> Result<(), DriverError> {
        session
            .execute_script("mobile: backgroundApp", json!({"seconds": duration.as_secs()}))
            .await?;
        Ok(())
    }

    async fn hide_keyboard(&self, session: &Session) -> Result<(), DriverError> {
        session
            .execute_script("mobile:hideKeyboard", serde_json::Value::Null)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_state_parses_exact_names() {
        assert_eq!("ON".parse::<PowerState>().unwrap(), PowerState::On);
        assert_eq!("OFF".parse::<PowerState>().unwrap(), PowerState::Off);
        assert!("on".parse::<PowerState>().is_err());
        assert!("DIM".parse::<PowerState>().is_err());
    }

    #[test]
    fn orientation_names() {
        assert_eq!(Orientation::Landscape.to_string(), "LANDSCAPE");
        assert_eq!(Orientation::Portrait.as_str(), "PORTRAIT");
    }

    #[test]
    fn ui_scrollable_expression_embeds_ids() {
        let expr = ui_scrollable_expression("com.app:id/list", "Backpack");
        assert!(expr.starts_with("new UiScrollable(new UiSelector().scrollable(true).resourceId(\"com.app:id/list\"))"));
        assert!(expr.ends_with(".setAsHorizontalList().scrollIntoView(new UiSelector().text(\"Backpack\"))"));
    }

    #[test]
    fn only_android_supports_power() {
        assert!(AndroidControls.supports_power_ac());
        assert!(!IosControls.supports_power_ac());
        assert!(!GenericControls.supports_power_ac());
    }
}
