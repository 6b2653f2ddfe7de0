//! Google search in a mobile browser.

use async_trait::async_trait;

use tapline_core::element::Element;
use tapline_core::error::DriverError;
use tapline_core::locator::Locator;
use tapline_core::page::Page;
use tapline_core::screen::Screen;
use tapline_core::session::Session;
use tapline_core::wait::WaitStrategy;

pub(crate) const SEARCH_BOX: &str = "//input[@aria-label='Search']";
pub(crate) const RESULTS: &str = "#search";
pub(crate) const RESULT_TITLES: &str = "#search h3";

/// The Google start page.
pub struct GoogleSearchPage<'s> {
    screen: Screen<'s>,
    search_box: Element<'s>,
}

#[async_trait]
impl<'s> Page<'s> for GoogleSearchPage<'s> {
    const NAME: &'static str = "Google Search";

    async fn load(session: &'s Session) -> Result<Self, DriverError> {
        let screen = Screen::new(session);
        let search_box = screen.element(&Locator::xpath(SEARCH_BOX)).await?;
        Ok(Self { screen, search_box })
    }
}

impl<'s> GoogleSearchPage<'s> {
    /// Types `text` into the search box, submits it and loads the results.
    pub async fn perform_search(self, text: &str) -> Result<GoogleSearchResultPage<'s>, DriverError> {
        self.screen
            .enter_value_and_press_enter(&self.search_box, text, "Search text box")
            .await?;
        GoogleSearchResultPage::load(self.screen.session()).await
    }
}

/// The result list of a Google search.
pub struct GoogleSearchResultPage<'s> {
    screen: Screen<'s>,
    results: Element<'s>,
}

#[async_trait]
impl<'s> Page<'s> for GoogleSearchResultPage<'s> {
    const NAME: &'static str = "Google Search Results";

    async fn load(session: &'s Session) -> Result<Self, DriverError> {
        let screen = Screen::new(session);
        let results = screen.element(&Locator::css(RESULTS)).await?;
        Ok(Self { screen, results })
    }
}

impl GoogleSearchResultPage<'_> {
    pub async fn is_displayed(&self) -> Result<bool, DriverError> {
        self.screen.is_displayed(&self.results).await
    }

    /// Titles of the listed results, in page order.
    pub async fn result_titles(&self) -> Result<Vec<String>, DriverError> {
        let session = self.screen.session();
        let mut titles = Vec::new();
        for heading in session.find_elements(&Locator::css(RESULT_TITLES)).await? {
            titles.push(self.screen.text(&heading, WaitStrategy::None).await?);
        }
        Ok(titles)
    }
}
