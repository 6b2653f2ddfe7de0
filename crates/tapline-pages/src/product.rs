use async_trait::async_trait;

use tapline_core::element::Element;
use tapline_core::error::DriverError;
use tapline_core::locator::Locator;
use tapline_core::page::Page;
use tapline_core::screen::Screen;
use tapline_core::session::Session;
use tapline_core::wait::WaitStrategy;

pub(crate) const TITLE: &str = "//android.view.ViewGroup[@content-desc=\"test-Cart drop zone\"]/android.view.ViewGroup/android.widget.TextView";

/// The product list shown after login.
pub struct ProductPage<'s> {
    screen: Screen<'s>,
    title: Element<'s>,
}

#[async_trait]
impl<'s> Page<'s> for ProductPage<'s> {
    const NAME: &'static str = "Products";

    async fn load(session: &'s Session) -> Result<Self, DriverError> {
        let screen = Screen::new(session);
        let title = screen.element(&Locator::xpath(TITLE)).await?;
        Ok(Self { screen, title })
    }
}

impl ProductPage<'_> {
    /// Page title, once it is visible.
    pub async fn title(&self) -> Result<String, DriverError> {
        self.screen.text(&self.title, WaitStrategy::Visible).await
    }
}
