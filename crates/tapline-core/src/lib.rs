//! # tapline-core
//!
//! Core library for mobile UI automation against an Appium (W3C WebDriver)
//! server.
//!
//! The crate opens sessions on Android and iOS devices, locates elements,
//! drives touch gestures and device controls, and reports what each action
//! did. Page objects are built on top of the [`screen`] action layer.
//!
//! ## Modules
//!
//! - [`wire`] - WebDriver command and reply format
//! - [`transport`] - HTTP transport to the automation server
//! - [`config`] - Settings lookup (`~/.tapline/config.json`)
//! - [`capabilities`] - Session capability sets
//! - [`driver`] - Driver factory for the Android/iOS native/web variants
//! - [`session`] - Live session handle and its element handles
//! - [`registry`] - Per-task session binding
//! - [`locator`] - Element lookup strategies
//! - [`gesture`] - W3C pointer action sequences
//! - [`controls`] - Platform-specific device controls
//! - [`report`] - Report entries and sinks
//! - [`wait`] - Explicit waits on element state
//! - [`screen`] - Action layer used by page objects
//! - [`page`] - Page object trait
//! - [`replay`] - Scripted transport for offline runs
//!
//! ## Example
//!
//! ```no_run
//! use tapline_core::driver::{DeviceTarget, DriverFactory, DriverKind};
//! use tapline_core::locator::Locator;
//! use tapline_core::screen::Screen;
//!
//! # async fn example() -> Result<(), tapline_core::error::DriverError> {
//! let factory = DriverFactory::from_default_config()?;
//! let target = DeviceTarget::new("iPhone 15", "00008110-001A2C3E", 8100);
//! let session = factory.create(DriverKind::IosNative, &target).await?;
//!
//! let screen = Screen::new(&session);
//! screen.click_located(&Locator::accessibility_id("test-LOGIN"), "Login").await?;
//! session.quit().await?;
//! # Ok(())
//! # }
//! ```

pub mod capabilities;
pub mod config;
pub mod controls;
pub mod driver;
pub mod element;
pub mod error;
pub mod gesture;
pub mod locator;
pub mod page;
pub mod registry;
pub mod replay;
pub mod report;
pub mod screen;
pub mod session;
pub mod transport;
pub mod wait;
pub mod wire;
