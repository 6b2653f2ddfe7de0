//! Framework configuration.
//!
//! Settings such as the automation server URL, the app package under test or
//! the iOS bundle id are looked up through the [`ConfigLookup`] trait, keyed by
//! [`ConfigKey`]. The bundled implementation, [`JsonConfig`], reads a flat JSON
//! object, by default from `~/.tapline/config.json`:
//!
//! ```json
//! {
//!   "appiumURL": "http://127.0.0.1:4723",
//!   "appPackage": "com.swaglabsmobileapp",
//!   "appActivity": "com.swaglabsmobileapp.MainActivity",
//!   "bundleId": "org.reactjs.native.example.SwagLabsMobileApp",
//!   "avdLaunchTimeout": 180
//! }
//! ```
//!
//! Lookups happen when a driver is created, not when the config is loaded,
//! so a missing key only matters for the driver variant that needs it.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

const CONFIG_DIR: &str = ".tapline";
const CONFIG_FILENAME: &str = "config.json";

const DEFAULT_ANDROID_APP_PATH: &str = "apps/android/app.apk";
const DEFAULT_IOS_APP_PATH: &str = "apps/ios/app.app";
const DEFAULT_EXPLICIT_WAIT_SECS: &str = "10";

/// Errors raised while loading or reading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The key is not present in the configuration source.
    #[error("missing configuration key `{0}`")]
    Missing(ConfigKey),

    /// The key is present but its value cannot be used.
    #[error("invalid value `{value}` for configuration key `{key}`")]
    Invalid {
        /// The offending key.
        key: ConfigKey,
        /// The raw value found.
        value: String,
    },

    /// The configuration file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not a JSON object.
    #[error("cannot parse config file: {0}")]
    Parse(String),
}

/// Names of all settings the framework consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Android application package (`appPackage`).
    AppPackage,
    /// Android launch activity (`appActivity`).
    AppActivity,
    /// iOS bundle identifier (`bundleId`).
    BundleId,
    /// Emulator boot timeout in seconds (`avdLaunchTimeout`).
    AvdLaunchTimeout,
    /// Automation server endpoint (`appiumURL`).
    AppiumUrl,
    /// Path to the Android application binary (`androidAppPath`).
    AndroidAppPath,
    /// Path to the iOS application bundle (`iosAppPath`).
    IosAppPath,
    /// Default explicit wait in seconds (`explicitWait`).
    ExplicitWait,
}

impl ConfigKey {
    /// The JSON member name of this key.
    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::AppPackage => "appPackage",
            ConfigKey::AppActivity => "appActivity",
            ConfigKey::BundleId => "bundleId",
            ConfigKey::AvdLaunchTimeout => "avdLaunchTimeout",
            ConfigKey::AppiumUrl => "appiumURL",
            ConfigKey::AndroidAppPath => "androidAppPath",
            ConfigKey::IosAppPath => "iosAppPath",
            ConfigKey::ExplicitWait => "explicitWait",
        }
    }

    fn default_value(self) -> Option<&'static str> {
        match self {
            ConfigKey::AndroidAppPath => Some(DEFAULT_ANDROID_APP_PATH),
            ConfigKey::IosAppPath => Some(DEFAULT_IOS_APP_PATH),
            ConfigKey::ExplicitWait => Some(DEFAULT_EXPLICIT_WAIT_SECS),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of configuration values.
pub trait ConfigLookup: Send + Sync {
    /// Returns the raw string value for `key`.
    fn get(&self, key: ConfigKey) -> Result<String, ConfigError>;

    /// Reads `key` as a whole number of seconds.
    fn seconds(&self, key: ConfigKey) -> Result<u64, ConfigError> {
        let raw = self.get(key)?;
        raw.trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid { key, value: raw })
    }

    /// Reads `key` as a [`Duration`] of whole seconds.
    fn duration(&self, key: ConfigKey) -> Result<Duration, ConfigError> {
        self.seconds(key).map(Duration::from_secs)
    }
}

/// Returns the tapline directory (`~/.tapline/`), if a home directory exists.
pub fn tapline_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR))
}

/// Returns the default config file path (`~/.tapline/config.json`).
pub fn default_config_path() -> Option<PathBuf> {
    tapline_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// Configuration backed by a flat JSON object.
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    values: HashMap<String, String>,
}

impl JsonConfig {
    /// Loads configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Loads the default config file, or an empty config when none exists.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Parses configuration from JSON text.
    ///
    /// Scalar values are kept as strings; numbers and booleans are
    /// stringified. Nested values are rejected.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let root: Value = serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let members = match root {
            Value::Object(members) => members,
            _ => return Err(ConfigError::Parse("top level must be an object".into())),
        };
        let mut values = HashMap::with_capacity(members.len());
        for (name, value) in members {
            let raw = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => continue,
                other => {
                    return Err(ConfigError::Parse(format!(
                        "`{name}` must be a scalar, got {other}"
                    )))
                }
            };
            values.insert(name, raw);
        }
        Ok(Self { values })
    }

    /// Builds a config from `(key, value)` pairs.
    pub fn from_pairs<I, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (ConfigKey, V)>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(key, value)| (key.name().to_string(), value.into()))
            .collect();
        Self { values }
    }

    /// Sets or replaces a value.
    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) {
        self.values.insert(key.name().to_string(), value.into());
    }
}

impl ConfigLookup for JsonConfig {
    fn get(&self, key: ConfigKey) -> Result<String, ConfigError> {
        self.values
            .get(key.name())
            .cloned()
            .or_else(|| key.default_value().map(str::to_string))
            .ok_or(ConfigError::Missing(key))
    }
}
