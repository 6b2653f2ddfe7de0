//! # tapline-pages
//!
//! Page objects for the Swag Labs sample app and for Google search in a
//! mobile browser.
//!
//! Each page resolves its elements when it is loaded through
//! [`Page::load`](tapline_core::page::Page::load). Navigation methods consume
//! the current page and load the next one:
//!
//! ```no_run
//! use tapline_core::page::Page;
//! use tapline_core::session::Session;
//! use tapline_pages::LoginPage;
//!
//! # async fn example(session: &Session) -> Result<(), tapline_core::error::DriverError> {
//! let login = LoginPage::load(session).await?;
//! let products = login.login("standard_user", "secret_sauce").await?;
//! assert_eq!(products.title().await?, "PRODUCTS");
//! # Ok(())
//! # }
//! ```

mod google;
mod login;
mod product;
mod settings;

pub use google::{GoogleSearchPage, GoogleSearchResultPage};
pub use login::LoginPage;
pub use product::ProductPage;
pub use settings::SettingsPage;
