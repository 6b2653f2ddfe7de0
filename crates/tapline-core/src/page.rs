//! Page objects.
//!
//! A page object models one application screen: it resolves the screen's
//! elements when it is loaded and exposes the actions a test performs there.
//! Navigation methods consume the page and return the page that follows, so
//! a stale page cannot be used after the app has moved on.
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use tapline_core::element::Element;
//! use tapline_core::error::DriverError;
//! use tapline_core::locator::Locator;
//! use tapline_core::page::Page;
//! use tapline_core::session::Session;
//!
//! struct CartPage<'s> {
//!     checkout: Element<'s>,
//! }
//!
//! #[async_trait]
//! impl<'s> Page<'s> for CartPage<'s> {
//!     const NAME: &'static str = "Cart";
//!
//!     async fn load(session: &'s Session) -> Result<Self, DriverError> {
//!         let checkout = session.find_element(&Locator::accessibility_id("test-CHECKOUT")).await?;
//!         Ok(Self { checkout })
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::error::DriverError;
use crate::session::Session;

/// One application screen bound to a session.
#[async_trait]
pub trait Page<'s>: Sized + Send {
    /// Human-readable page name used in reports.
    const NAME: &'static str;

    /// Locates the page's elements. A failed lookup aborts the load.
    async fn load(session: &'s Session) -> Result<Self, DriverError>;
}
