use async_trait::async_trait;

use tapline_core::element::Element;
use tapline_core::error::DriverError;
use tapline_core::locator::Locator;
use tapline_core::page::Page;
use tapline_core::screen::Screen;
use tapline_core::session::Session;

use crate::LoginPage;

pub(crate) const LOG_OUT: &str = "test-LOGOUT";

/// The side menu holding the logout entry.
pub struct SettingsPage<'s> {
    screen: Screen<'s>,
    log_out_button: Element<'s>,
}

#[async_trait]
impl<'s> Page<'s> for SettingsPage<'s> {
    const NAME: &'static str = "Settings";

    async fn load(session: &'s Session) -> Result<Self, DriverError> {
        let screen = Screen::new(session);
        let log_out_button = screen.element(&Locator::accessibility_id(LOG_OUT)).await?;
        Ok(Self {
            screen,
            log_out_button,
        })
    }
}

impl<'s> SettingsPage<'s> {
    /// Logs out and returns to the login screen.
    pub async fn press_log_out_button(self) -> Result<LoginPage<'s>, DriverError> {
        self.screen.click(&self.log_out_button, "Logout").await?;
        LoginPage::load(self.screen.session()).await
    }
}
