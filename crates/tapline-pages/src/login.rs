use async_trait::async_trait;
use tracing::debug;

use tapline_core::element::Element;
use tapline_core::error::DriverError;
use tapline_core::locator::Locator;
use tapline_core::page::Page;
use tapline_core::screen::Screen;
use tapline_core::session::Session;

use crate::ProductPage;

pub(crate) const USERNAME: &str = "test-Username";
pub(crate) const PASSWORD: &str = "test-Password";
pub(crate) const LOGIN_BUTTON: &str = "test-LOGIN";

/// The Swag Labs login screen.
pub struct LoginPage<'s> {
    screen: Screen<'s>,
    username: Element<'s>,
    password: Element<'s>,
    login_button: Element<'s>,
}

#[async_trait]
impl<'s> Page<'s> for LoginPage<'s> {
    const NAME: &'static str = "Login";

    async fn load(session: &'s Session) -> Result<Self, DriverError> {
        let screen = Screen::new(session);
        let username = screen.element(&Locator::accessibility_id(USERNAME)).await?;
        let password = screen.element(&Locator::accessibility_id(PASSWORD)).await?;
        let login_button = screen
            .element(&Locator::accessibility_id(LOGIN_BUTTON))
            .await?;
        debug!(page = Self::NAME, "page loaded");
        Ok(Self {
            screen,
            username,
            password,
            login_button,
        })
    }
}

impl<'s> LoginPage<'s> {
    pub async fn set_username(&self, username: &str) -> Result<(), DriverError> {
        self.screen.enter(&self.username, username, "Username").await
    }

    pub async fn set_password(&self, password: &str) -> Result<(), DriverError> {
        self.screen.enter(&self.password, password, "Password").await
    }

    /// Taps the login button and loads the product list.
    pub async fn tap_on_login(self) -> Result<ProductPage<'s>, DriverError> {
        self.screen.click(&self.login_button, "Login").await?;
        ProductPage::load(self.screen.session()).await
    }

    /// Fills both fields and logs in.
    pub async fn login(self, username: &str, password: &str) -> Result<ProductPage<'s>, DriverError> {
        self.set_username(username).await?;
        self.set_password(password).await?;
        self.tap_on_login().await
    }
}
