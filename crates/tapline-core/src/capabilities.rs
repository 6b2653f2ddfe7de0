//! Session capabilities.
//!
//! A [`Capabilities`] set describes the session a client asks the server for:
//! platform, device, app under test, ports. Appium-specific names carry the
//! `appium:` vendor prefix required by the W3C protocol; the standard names
//! (`platformName`, `browserName`) are sent as-is.

use serde_json::{json, Map, Value};

/// Standard W3C capability names, sent without a vendor prefix.
const STANDARD_CAPABILITIES: &[&str] = &[
    "platformName",
    "browserName",
    "browserVersion",
    "acceptInsecureCerts",
    "pageLoadStrategy",
    "proxy",
    "timeouts",
    "unhandledPromptBehavior",
];

const VENDOR_PREFIX: &str = "appium:";

/// Capability names used by the driver factory.
pub mod names {
    pub const PLATFORM_NAME: &str = "platformName";
    pub const BROWSER_NAME: &str = "browserName";
    pub const DEVICE_NAME: &str = "deviceName";
    pub const AUTOMATION_NAME: &str = "automationName";
    pub const UDID: &str = "udid";
    pub const APP: &str = "app";
    pub const APP_PACKAGE: &str = "appPackage";
    pub const APP_ACTIVITY: &str = "appActivity";
    pub const SYSTEM_PORT: &str = "systemPort";
    pub const AVD: &str = "avd";
    pub const AVD_LAUNCH_TIMEOUT: &str = "avdLaunchTimeout";
    pub const CHROMEDRIVER_PORT: &str = "chromedriverPort";
    pub const BUNDLE_ID: &str = "bundleId";
    pub const WDA_LOCAL_PORT: &str = "wdaLocalPort";
    pub const WEBKIT_DEBUG_PROXY_PORT: &str = "webkitDebugProxyPort";
}

/// An ordered set of capability name/value pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capabilities {
    entries: Map<String, Value>,
}

fn wire_name(name: &str) -> String {
    if STANDARD_CAPABILITIES.contains(&name) || name.contains(':') {
        name.to_string()
    } else {
        format!("{VENDOR_PREFIX}{name}")
    }
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a capability, replacing any existing value.
    ///
    /// Non-standard names are stored with the `appium:` prefix.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(wire_name(name), value.into());
        self
    }

    /// Looks a capability up by its short or prefixed name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(&wire_name(name))
    }

    /// Looks a string capability up.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&wire_name(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(wire name, value)` pairs sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Builds the `POST /session` request body.
    pub fn to_session_request(&self) -> Value {
        json!({
            "capabilities": {
                "alwaysMatch": Value::Object(self.entries.clone()),
                "firstMatch": [{}],
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_names_are_prefixed() {
        let mut caps = Capabilities::new();
        caps.set(names::PLATFORM_NAME, "ANDROID")
            .set(names::DEVICE_NAME, "Pixel_7")
            .set(names::SYSTEM_PORT, 8201);

        let body = caps.to_session_request();
        let always = &body["capabilities"]["alwaysMatch"];
        assert_eq!(always["platformName"], "ANDROID");
        assert_eq!(always["appium:deviceName"], "Pixel_7");
        assert_eq!(always["appium:systemPort"], 8201);
        assert_eq!(body["capabilities"]["firstMatch"], json!([{}]));
    }

    #[test]
    fn lookups_accept_short_names() {
        let mut caps = Capabilities::new();
        caps.set(names::UDID, "emulator-5554");
        assert!(caps.contains("udid"));
        assert!(caps.contains("appium:udid"));
        assert_eq!(caps.get_str(names::UDID), Some("emulator-5554"));
        assert!(!caps.contains(names::AVD));
    }

    #[test]
    fn already_prefixed_names_are_kept() {
        let mut caps = Capabilities::new();
        caps.set("goog:chromeOptions", json!({"w3c": true}));
        assert_eq!(caps.iter().next().map(|(k, _)| k), Some("goog:chromeOptions"));
    }

    #[test]
    fn set_replaces_existing_value() {
        let mut caps = Capabilities::new();
        caps.set(names::APP, "a.apk").set(names::APP, "b.apk");
        assert_eq!(caps.len(), 1);
        assert_eq!(caps.get_str(names::APP), Some("b.apk"));
    }
}
