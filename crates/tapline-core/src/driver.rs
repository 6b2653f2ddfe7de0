//! Driver factory.
//!
//! [`DriverFactory`] turns a [`DriverKind`] and a [`DeviceTarget`] into a
//! live [`Session`]. Configuration is read when a driver is created, the
//! capability set for the variant is built, and a session is opened against
//! the configured automation server URL.
//!
//! Every failure on the way is reported as
//! [`DriverError::Initialization`] with the original cause as its source.
//!
//! # Example
//!
//! ```no_run
//! use tapline_core::driver::{create_android_driver_for_native_app, DeviceTarget};
//!
//! # async fn example() -> Result<(), tapline_core::error::DriverError> {
//! let target = DeviceTarget::new("Pixel_7_API_34", "emulator-5554", 8200).emulator("yes");
//! let session = create_android_driver_for_native_app(&target).await?;
//! println!("session {} on {}", session.id(), session.platform());
//! session.quit().await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::capabilities::{names, Capabilities};
use crate::config::{ConfigKey, ConfigLookup, JsonConfig};
use crate::error::DriverError;
use crate::report::{Reporter, TracingReporter};
use crate::session::{Platform, Session};
use crate::transport::{HttpTransport, Transport};
use crate::wire::WireError;

const ANDROID_AUTOMATION: &str = "UiAutomator2";
const IOS_AUTOMATION: &str = "XCUITest";
const ANDROID_BROWSER: &str = "Chrome";
const IOS_BROWSER: &str = "Safari";

// ---------------------------------------------------------------------------
// Targets and variants
// ---------------------------------------------------------------------------

/// The device a driver is created for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTarget {
    pub device_name: String,
    pub udid: String,
    /// Local port of the platform helper: `systemPort` for native Android,
    /// `chromedriverPort` for Android web, `wdaLocalPort` for native iOS
    /// and `webkitDebugProxyPort` for iOS web.
    pub port: u16,
    /// `yes` (any case) boots the named AVD. Android only.
    pub emulator: String,
}

impl DeviceTarget {
    pub fn new(device_name: impl Into<String>, udid: impl Into<String>, port: u16) -> Self {
        Self {
            device_name: device_name.into(),
            udid: udid.into(),
            port,
            emulator: String::new(),
        }
    }

    pub fn emulator(mut self, flag: impl Into<String>) -> Self {
        self.emulator = flag.into();
        self
    }

    /// Whether the emulator flag asks for an AVD launch.
    pub fn launches_emulator(&self) -> bool {
        self.emulator.eq_ignore_ascii_case("yes")
    }
}

/// What is under test: an installed app or the platform browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKind {
    Native,
    Web,
}

impl AppKind {
    pub fn name(self) -> &'static str {
        match self {
            AppKind::Native => "native",
            AppKind::Web => "web",
        }
    }
}

/// The four supported driver variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    AndroidNative,
    AndroidWeb,
    IosNative,
    IosWeb,
}

impl DriverKind {
    pub const ALL: [DriverKind; 4] = [
        DriverKind::AndroidNative,
        DriverKind::AndroidWeb,
        DriverKind::IosNative,
        DriverKind::IosWeb,
    ];

    pub fn platform(self) -> Platform {
        match self {
            DriverKind::AndroidNative | DriverKind::AndroidWeb => Platform::Android,
            DriverKind::IosNative | DriverKind::IosWeb => Platform::Ios,
        }
    }

    pub fn app_kind(self) -> AppKind {
        match self {
            DriverKind::AndroidNative | DriverKind::IosNative => AppKind::Native,
            DriverKind::AndroidWeb | DriverKind::IosWeb => AppKind::Web,
        }
    }

    /// Command-line name, e.g. `android-native`.
    pub fn name(self) -> &'static str {
        match self {
            DriverKind::AndroidNative => "android-native",
            DriverKind::AndroidWeb => "android-web",
            DriverKind::IosNative => "ios-native",
            DriverKind::IosWeb => "ios-web",
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DriverKind {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DriverKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| DriverError::InvalidArgument(format!("unknown driver kind `{s}`")))
    }
}

// ---------------------------------------------------------------------------
// Capability builders
// ---------------------------------------------------------------------------

fn android_base(caps: &mut Capabilities, target: &DeviceTarget) {
    caps.set(names::PLATFORM_NAME, Platform::Android.name())
        .set(names::DEVICE_NAME, target.device_name.as_str())
        .set(names::AUTOMATION_NAME, ANDROID_AUTOMATION)
        .set(names::UDID, target.udid.as_str());
}

fn android_emulator(
    caps: &mut Capabilities,
    target: &DeviceTarget,
    config: &dyn ConfigLookup,
) -> Result<(), DriverError> {
    if target.launches_emulator() {
        let timeout = config.seconds(ConfigKey::AvdLaunchTimeout)?;
        caps.set(names::AVD, target.device_name.as_str())
            .set(names::AVD_LAUNCH_TIMEOUT, timeout.saturating_mul(1000));
    }
    Ok(())
}

fn ios_base(caps: &mut Capabilities, target: &DeviceTarget, config: &dyn ConfigLookup) -> Result<(), DriverError> {
    caps.set(names::PLATFORM_NAME, Platform::Ios.name())
        .set(names::DEVICE_NAME, target.device_name.as_str())
        .set(names::AUTOMATION_NAME, IOS_AUTOMATION)
        .set(names::UDID, target.udid.as_str())
        .set(names::BUNDLE_ID, config.get(ConfigKey::BundleId)?);
    Ok(())
}

/// Capabilities for a native Android app.
pub fn android_native_capabilities(
    target: &DeviceTarget,
    config: &dyn ConfigLookup,
) -> Result<Capabilities, DriverError> {
    let mut caps = Capabilities::new();
    android_base(&mut caps, target);
    caps.set(names::APP, config.get(ConfigKey::AndroidAppPath)?)
        .set(names::APP_PACKAGE, config.get(ConfigKey::AppPackage)?)
        .set(names::APP_ACTIVITY, config.get(ConfigKey::AppActivity)?)
        .set(names::SYSTEM_PORT, target.port);
    android_emulator(&mut caps, target, config)?;
    Ok(caps)
}

/// Capabilities for Chrome on Android.
pub fn android_web_capabilities(
    target: &DeviceTarget,
    config: &dyn ConfigLookup,
) -> Result<Capabilities, DriverError> {
    let mut caps = Capabilities::new();
    android_base(&mut caps, target);
    caps.set(names::BROWSER_NAME, ANDROID_BROWSER)
        .set(names::CHROMEDRIVER_PORT, target.port);
    android_emulator(&mut caps, target, config)?;
    Ok(caps)
}

/// Capabilities for a native iOS app.
pub fn ios_native_capabilities(
    target: &DeviceTarget,
    config: &dyn ConfigLookup,
) -> Result<Capabilities, DriverError> {
    let mut caps = Capabilities::new();
    ios_base(&mut caps, target, config)?;
    caps.set(names::APP, config.get(ConfigKey::IosAppPath)?)
        .set(names::WDA_LOCAL_PORT, target.port);
    Ok(caps)
}

/// Capabilities for Safari on iOS.
pub fn ios_web_capabilities(
    target: &DeviceTarget,
    config: &dyn ConfigLookup,
) -> Result<Capabilities, DriverError> {
    let mut caps = Capabilities::new();
    ios_base(&mut caps, target, config)?;
    caps.set(names::BROWSER_NAME, IOS_BROWSER)
        .set(names::WEBKIT_DEBUG_PROXY_PORT, target.port);
    Ok(caps)
}

/// Builds the capability set for `kind`.
pub fn capabilities_for(
    kind: DriverKind,
    target: &DeviceTarget,
    config: &dyn ConfigLookup,
) -> Result<Capabilities, DriverError> {
    match kind {
        DriverKind::AndroidNative => android_native_capabilities(target, config),
        DriverKind::AndroidWeb => android_web_capabilities(target, config),
        DriverKind::IosNative => ios_native_capabilities(target, config),
        DriverKind::IosWeb => ios_web_capabilities(target, config),
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Creates the transport for an automation server URL.
pub trait Connector: Send + Sync {
    fn connect(&self, url: &str) -> Result<Arc<dyn Transport>, WireError>;
}

/// Connects over HTTP.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpConnector;

impl Connector for HttpConnector {
    fn connect(&self, url: &str) -> Result<Arc<dyn Transport>, WireError> {
        Ok(Arc::new(HttpTransport::new(url)?))
    }
}

impl<F> Connector for F
where
    F: Fn(&str) -> Result<Arc<dyn Transport>, WireError> + Send + Sync,
{
    fn connect(&self, url: &str) -> Result<Arc<dyn Transport>, WireError> {
        self(url)
    }
}

/// Opens sessions for the four driver variants.
pub struct DriverFactory<K = HttpConnector> {
    config: Arc<dyn ConfigLookup>,
    connector: K,
    reporter: Arc<dyn Reporter>,
}

impl DriverFactory<HttpConnector> {
    /// A factory reading `~/.tapline/config.json` and connecting over HTTP.
    pub fn from_default_config() -> Result<Self, DriverError> {
        let config = JsonConfig::load_default().map_err(DriverError::initialization)?;
        Ok(Self::new(Arc::new(config), HttpConnector))
    }
}

impl<K: Connector> DriverFactory<K> {
    pub fn new(config: Arc<dyn ConfigLookup>, connector: K) -> Self {
        Self {
            config,
            connector,
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Replaces the reporter handed to created sessions.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &dyn ConfigLookup {
        self.config.as_ref()
    }

    /// Creates a session for `kind` on `target`.
    #[instrument(skip_all, fields(kind = %kind, device = %target.device_name))]
    pub async fn create(&self, kind: DriverKind, target: &DeviceTarget) -> Result<Session, DriverError> {
        let session = self
            .open(kind, target)
            .await
            .map_err(DriverError::initialization)?;
        info!(session_id = %session.id(), "driver created");
        Ok(session)
    }

    async fn open(&self, kind: DriverKind, target: &DeviceTarget) -> Result<Session, DriverError> {
        let caps = capabilities_for(kind, target, self.config.as_ref())?;
        let url = self.config.get(ConfigKey::AppiumUrl)?;
        let explicit_wait = self.config.duration(ConfigKey::ExplicitWait)?;
        let transport = self.connector.connect(&url)?;
        let session = Session::open(transport, caps, Arc::clone(&self.reporter)).await?;
        Ok(session.with_explicit_wait(explicit_wait))
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

async fn create_default(kind: DriverKind, target: &DeviceTarget) -> Result<Session, DriverError> {
    DriverFactory::from_default_config()?.create(kind, target).await
}

/// Opens a native-app session on an Android device or emulator.
pub async fn create_android_driver_for_native_app(target: &DeviceTarget) -> Result<Session, DriverError> {
    create_default(DriverKind::AndroidNative, target).await
}

/// Opens a Chrome session on an Android device or emulator.
pub async fn create_android_driver_for_web(target: &DeviceTarget) -> Result<Session, DriverError> {
    create_default(DriverKind::AndroidWeb, target).await
}

/// Opens a native-app session on an iOS device or simulator.
pub async fn create_ios_driver_for_native_app(target: &DeviceTarget) -> Result<Session, DriverError> {
    create_default(DriverKind::IosNative, target).await
}

/// Opens a Safari session on an iOS device or simulator.
pub async fn create_ios_driver_for_web(target: &DeviceTarget) -> Result<Session, DriverError> {
    create_default(DriverKind::IosWeb, target).await
}
