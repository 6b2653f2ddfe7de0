//! Screen actions.
//!
//! [`Screen`] is the action layer that page objects are built from. It
//! wraps a [`Session`] and offers element interactions, reads, touch
//! gestures, `mobile:` script commands and device controls.
//!
//! Every operation returns a `Result`. Interactions also record a report
//! entry: `Info` when they succeed, `Fail` with the cause when they do not,
//! so the report and the caller see the same outcome.
//!
//! # Example
//!
//! ```no_run
//! use tapline_core::locator::Locator;
//! use tapline_core::screen::Screen;
//! use tapline_core::session::Session;
//! use tapline_core::wait::WaitStrategy;
//!
//! # async fn example(session: &Session) -> Result<(), tapline_core::error::DriverError> {
//! let screen = Screen::new(session);
//! let user = screen.element(&Locator::accessibility_id("test-Username")).await?;
//! screen.enter(&user, "standard_user", "Username").await?;
//! screen.click_located(&Locator::accessibility_id("test-LOGIN"), "Login").await?;
//! let title = screen.element(&Locator::xpath("//android.widget.TextView[@text='PRODUCTS']")).await?;
//! println!("{}", screen.text(&title, WaitStrategy::Visible).await?);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use crate::controls::{Orientation, PowerState};
use crate::element::{Element, ENTER_KEY};
use crate::error::DriverError;
use crate::gesture::{self, Origin};
use crate::locator::Locator;
use crate::report::Reporter;
use crate::session::Session;
use crate::wait::{wait_for, WaitStrategy};

const DOUBLE_TAP_GAP: Duration = Duration::from_millis(100);
const TAP_SETTLE: Duration = Duration::from_millis(250);
const COORDINATE_TAP_HOLD: Duration = Duration::from_millis(50);
const LONG_TAP_HOLD: Duration = Duration::from_millis(2000);
const LONG_PRESS_HOLD: Duration = Duration::from_millis(1000);
const MULTI_TOUCH_HOLD: Duration = Duration::from_secs(1);
const SCROLL_DURATION: Duration = Duration::from_millis(800);
const SWIPE_DURATION: Duration = Duration::from_millis(1000);
const BACKGROUND_DURATION: Duration = Duration::from_secs(10);

/// Action layer over one session.
#[derive(Debug, Clone, Copy)]
pub struct Screen<'s> {
    session: &'s Session,
    wait_timeout: Duration,
}

impl<'s> Screen<'s> {
    /// A screen using the session's explicit wait.
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            wait_timeout: session.explicit_wait(),
        }
    }

    /// Overrides the explicit wait timeout.
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    pub fn session(&self) -> &'s Session {
        self.session
    }

    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    fn reporter(&self) -> &dyn Reporter {
        self.session.reporter().as_ref()
    }

    /// Records the outcome of an interaction and hands the result back.
    fn outcome<T>(
        &self,
        result: Result<T, DriverError>,
        success: impl FnOnce() -> String,
        failure: impl FnOnce() -> String,
    ) -> Result<T, DriverError> {
        match result {
            Ok(value) => {
                self.reporter().info(&success());
                Ok(value)
            }
            Err(err) => {
                self.reporter().fail(&failure(), Some(err.to_string()));
                Err(err)
            }
        }
    }

    /// Records only failures.
    fn checked<T>(
        &self,
        result: Result<T, DriverError>,
        failure: impl FnOnce() -> String,
    ) -> Result<T, DriverError> {
        if let Err(err) = &result {
            self.reporter().fail(&failure(), Some(err.to_string()));
        }
        result
    }

    async fn pause(duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Finds an element by locator.
    pub async fn element(&self, locator: &Locator) -> Result<Element<'s>, DriverError> {
        self.session.find_element(locator).await
    }

    /// Finds an element for a runtime-built XPath or CSS query.
    ///
    /// Other strategies are not dynamic lookups and yield `Ok(None)`.
    pub async fn dynamic_element(&self, locator: &Locator) -> Result<Option<Element<'s>>, DriverError> {
        match locator.dynamic_lookup() {
            Some(locator) => self.session.find_element(locator).await.map(Some),
            None => Ok(None),
        }
    }

    // -----------------------------------------------------------------------
    // Interactions
    // -----------------------------------------------------------------------

    pub async fn click(&self, element: &Element<'_>, name: &str) -> Result<(), DriverError> {
        let result = element.click().await;
        self.outcome(
            result,
            || format!("Clicked on {name}"),
            || format!("Exception occurred when clicking on - {name}"),
        )
    }

    pub async fn click_located(&self, locator: &Locator, name: &str) -> Result<(), DriverError> {
        let element = self.checked(self.element(locator).await, || {
            format!("Exception occurred when clicking on - {name}")
        })?;
        self.click(&element, name).await
    }

    /// Waits for the field to be visible, clears it and types `value`.
    pub async fn enter(&self, element: &Element<'_>, value: &str, name: &str) -> Result<(), DriverError> {
        let result = async {
            wait_for(element, WaitStrategy::Visible, self.wait_timeout).await?;
            element.clear().await?;
            element.send_keys(value).await
        }
        .await;
        self.outcome(
            result,
            || format!("Entered value - {value} in the field {name}"),
            || format!("Exception occurred while entering value in the field - {name}"),
        )
    }

    pub async fn enter_located(
        &self,
        locator: &Locator,
        value: &str,
        name: &str,
    ) -> Result<(), DriverError> {
        let element = self.checked(self.element(locator).await, || {
            format!("Exception occurred while entering value in the field - {name}")
        })?;
        self.enter(&element, value, name).await
    }

    /// Clears the field, types `value` and presses Enter.
    pub async fn enter_value_and_press_enter(
        &self,
        element: &Element<'_>,
        value: &str,
        name: &str,
    ) -> Result<(), DriverError> {
        let result = async {
            element.clear().await?;
            element.send_keys(&format!("{value}{ENTER_KEY}")).await
        }
        .await;
        self.outcome(
            result,
            || format!("Entered value - {value} in the field {name} and pressed enter"),
            || format!("Exception caught while entering value in the field - {name}"),
        )
    }

    pub async fn clear(&self, element: &Element<'_>) -> Result<(), DriverError> {
        let result = element.clear().await;
        self.checked(result, || format!("Exception caught while clearing {element}"))
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Element text after waiting for `wait`.
    pub async fn text(&self, element: &Element<'_>, wait: WaitStrategy) -> Result<String, DriverError> {
        let result = async {
            wait_for(element, wait, self.wait_timeout).await?;
            element.text().await
        }
        .await;
        self.checked(result, || format!("Exception caught while reading text of {element}"))
    }

    /// The `text` attribute after waiting for `wait`.
    pub async fn text_from_attribute(
        &self,
        wait: WaitStrategy,
        element: &Element<'_>,
    ) -> Result<Option<String>, DriverError> {
        let result = async {
            wait_for(element, wait, self.wait_timeout).await?;
            element.attribute("text").await
        }
        .await;
        self.checked(result, || format!("Exception caught while reading text attribute of {element}"))
    }

    pub async fn attribute(&self, element: &Element<'_>, name: &str) -> Result<Option<String>, DriverError> {
        let result = element.attribute(name).await;
        self.checked(result, || format!("Exception caught while reading attribute {name} of {element}"))
    }

    pub async fn is_displayed(&self, element: &Element<'_>) -> Result<bool, DriverError> {
        let result = element.is_displayed().await;
        self.checked(result, || format!("Exception caught while checking {element} is displayed"))
    }

    pub async fn is_selected(&self, element: &Element<'_>) -> Result<bool, DriverError> {
        let result = element.is_selected().await;
        self.checked(result, || format!("Exception caught while checking {element} is selected"))
    }

    pub async fn is_enabled(&self, element: &Element<'_>) -> Result<bool, DriverError> {
        let result = element.is_enabled().await;
        self.checked(result, || format!("Exception caught while checking {element} is enabled"))
    }

    pub async fn active_element(&self) -> Result<Element<'s>, DriverError> {
        self.session.active_element().await
    }

    /// Whether the page source contains `text`.
    pub async fn is_text_present(&self, text: &str) -> Result<bool, DriverError> {
        let source = self.session.page_source().await;
        self.checked(source, || "Exception caught while reading page source".to_string())
            .map(|source| source.contains(text))
    }

    pub async fn server_status(&self) -> Result<Value, DriverError> {
        let status = self.session.status().await;
        self.checked(status, || "Exception caught while reading server status".to_string())
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    async fn tap_element(&self, element: &Element<'_>) -> Result<(), DriverError> {
        let sequence = gesture::tap(Origin::Element(element.id().to_string()), 0, 0);
        self.session.perform_actions(&[sequence]).await
    }

    async fn long_press_element(&self, element: &Element<'_>, hold: Duration) -> Result<(), DriverError> {
        let sequence = gesture::long_press(Origin::Element(element.id().to_string()), 0, 0, hold);
        self.session.perform_actions(&[sequence]).await
    }

    async fn press_coordinates(&self, x: i32, y: i32, hold: Duration) -> Result<(), DriverError> {
        let sequence = gesture::long_press(Origin::Viewport, x, y, hold);
        self.session.perform_actions(&[sequence]).await
    }

    async fn swipe_coordinates(
        &self,
        from: (i32, i32),
        to: (i32, i32),
        duration: Duration,
    ) -> Result<(), DriverError> {
        self.session
            .perform_actions(&[gesture::swipe(from, to, duration)])
            .await
    }

    pub async fn single_tap(&self, element: &Element<'_>) -> Result<(), DriverError> {
        let result = self.tap_element(element).await;
        self.outcome(
            result,
            || format!("Single tap on {element}"),
            || format!("Exception in single tap on {element}"),
        )
    }

    /// Two taps 100 ms apart.
    pub async fn double_tap(&self, element: &Element<'_>) -> Result<(), DriverError> {
        let result = async {
            self.tap_element(element).await?;
            Self::pause(DOUBLE_TAP_GAP).await;
            self.tap_element(element).await
        }
        .await;
        self.outcome(
            result,
            || format!("Double tap on {element}"),
            || format!("Exception in double tap on {element}"),
        )
    }

    /// Long press held for two seconds.
    pub async fn long_tap(&self, element: &Element<'_>) -> Result<(), DriverError> {
        let result = self.long_press_element(element, LONG_TAP_HOLD).await;
        self.outcome(
            result,
            || format!("Long press on {element}"),
            || format!("Exception in long tap on {element}"),
        )
    }

    /// Long press held for one second.
    pub async fn long_press(&self, element: &Element<'_>) -> Result<(), DriverError> {
        let result = self.long_press_element(element, LONG_PRESS_HOLD).await;
        self.checked(result, || {
            "Exception caught while performing long press on the Mobile Element".to_string()
        })
    }

    /// Taps the element, then lets the UI settle for 250 ms.
    pub async fn tap_by_element(&self, element: &Element<'_>) -> Result<(), DriverError> {
        let result = self.tap_element(element).await;
        let result = self.checked(result, || format!("Exception in tap on {element}"));
        Self::pause(TAP_SETTLE).await;
        result
    }

    /// Taps screen coordinates, then lets the UI settle for 250 ms.
    pub async fn tap_by_coordinates(&self, x: i32, y: i32) -> Result<(), DriverError> {
        let result = self.press_coordinates(x, y, COORDINATE_TAP_HOLD).await;
        let result = self.checked(result, || format!("Exception in tap at ({x}, {y})"));
        Self::pause(TAP_SETTLE).await;
        result
    }

    pub async fn press_by_element(&self, element: &Element<'_>, seconds: u64) -> Result<(), DriverError> {
        let result = self
            .long_press_element(element, Duration::from_secs(seconds))
            .await;
        self.checked(result, || format!("Exception in press on {element}"))
    }

    pub async fn long_press_by_element(&self, element: &Element<'_>, seconds: u64) -> Result<(), DriverError> {
        self.press_by_element(element, seconds).await
    }

    pub async fn press_by_coordinates(&self, x: i32, y: i32, seconds: u64) -> Result<(), DriverError> {
        let result = self
            .press_coordinates(x, y, Duration::from_secs(seconds))
            .await;
        self.checked(result, || format!("Exception in press at ({x}, {y})"))
    }

    /// Drags from the element's centre to `(x, y)` over 800 ms.
    pub async fn touch_screen_scroll(&self, element: &Element<'_>, x: i32, y: i32) -> Result<(), DriverError> {
        let result = async {
            let start = element.center().await?;
            self.swipe_coordinates(start, (x, y), SCROLL_DURATION).await
        }
        .await;
        self.checked(result, || format!("Exception in touch screen scroll from {element}"))
    }

    /// Swipes between two screen points.
    pub async fn swipe_between(
        &self,
        from: (i32, i32),
        to: (i32, i32),
        duration: Duration,
    ) -> Result<(), DriverError> {
        let result = self.swipe_coordinates(from, to, duration).await;
        self.checked(result, || format!("Exception in swipe from {from:?} to {to:?}"))
    }

    /// Swipes from the centre of one element to the centre of another.
    pub async fn swipe_by_elements(&self, start: &Element<'_>, end: &Element<'_>) -> Result<(), DriverError> {
        let result = async {
            let from = start.center().await?;
            let to = end.center().await?;
            self.swipe_coordinates(from, to, SWIPE_DURATION).await
        }
        .await;
        self.checked(result, || format!("Exception in swipe from {start} to {end}"))
    }

    /// Horizontal swipe between fractions of the screen width, at
    /// `anchor` fraction of the height.
    pub async fn horizontal_swipe_by_percentage(
        &self,
        start: f64,
        end: f64,
        anchor: f64,
    ) -> Result<(), DriverError> {
        let result = async {
            let (width, height) = self.session.window_size().await?;
            let y = (height as f64 * anchor) as i32;
            let from = (width as f64 * start) as i32;
            let to = (width as f64 * end) as i32;
            self.swipe_coordinates((from, y), (to, y), SWIPE_DURATION).await
        }
        .await;
        self.checked(result, || "Exception in horizontal swipe".to_string())
    }

    /// Vertical swipe between fractions of the screen height, at
    /// `anchor` fraction of the width.
    pub async fn vertical_swipe_by_percentages(
        &self,
        start: f64,
        end: f64,
        anchor: f64,
    ) -> Result<(), DriverError> {
        let result = async {
            let (width, height) = self.session.window_size().await?;
            let x = (width as f64 * anchor) as i32;
            let from = (height as f64 * start) as i32;
            let to = (height as f64 * end) as i32;
            self.swipe_coordinates((x, from), (x, to), SWIPE_DURATION).await
        }
        .await;
        self.checked(result, || "Exception in vertical swipe".to_string())
    }

    /// Repeats the same swipe `count` times, each taking `millis`.
    pub async fn swipe_axis(
        &self,
        x: i32,
        y: i32,
        x1: i32,
        y1: i32,
        count: u32,
        millis: u64,
    ) -> Result<(), DriverError> {
        let result = async {
            for _ in 0..count {
                self.swipe_coordinates((x, y), (x1, y1), Duration::from_millis(millis))
                    .await?;
            }
            Ok::<(), DriverError>(())
        }
        .await;
        self.checked(result, || format!("Exception in swipe from ({x}, {y}) to ({x1}, {y1})"))
    }

    /// One-second press standing in for a multi-finger touch.
    pub async fn multi_touch_by_element(&self, element: &Element<'_>) -> Result<(), DriverError> {
        let result = self.long_press_element(element, MULTI_TOUCH_HOLD).await;
        self.checked(result, || format!("Exception in multi touch on {element}"))
    }

    /// Moves the mouse pointer over an element with an offset from its centre.
    pub async fn move_to_element(&self, element: &Element<'_>, dx: i32, dy: i32) -> Result<(), DriverError> {
        let result = self
            .session
            .perform_actions(&[gesture::hover(element.id(), dx, dy)])
            .await;
        self.outcome(
            result,
            || format!("Move to target element : {element}"),
            || format!("Exception while moving to {element}"),
        )
    }

    pub async fn double_click_on_element(&self, element: &Element<'_>) -> Result<(), DriverError> {
        let result = self
            .session
            .perform_actions(&[gesture::double_click(element.id())])
            .await;
        self.outcome(
            result,
            || format!("Double click on element : {element}"),
            || format!("Exception while double clicking {element}"),
        )
    }

    // -----------------------------------------------------------------------
    // mobile: commands
    // -----------------------------------------------------------------------

    async fn mobile(&self, script: &str, args: Value, description: &str) -> Result<(), DriverError> {
        let result = self.session.execute_script(script, args).await.map(|_| ());
        self.outcome(
            result,
            || description.to_string(),
            || format!("Exception caught in {description}"),
        )
    }

    pub async fn swipe_down(&self) -> Result<(), DriverError> {
        self.mobile("mobile:scroll", json!({"direction": "down"}), "Swipe Down")
            .await
    }

    pub async fn swipe_up(&self) -> Result<(), DriverError> {
        self.mobile("mobile:scroll", json!({"direction": "up"}), "Swipe Up")
            .await
    }

    pub async fn accept_alert(&self) -> Result<(), DriverError> {
        self.mobile("mobile:acceptAlert", Value::Null, "Accept Alert").await
    }

    pub async fn dismiss_alert(&self) -> Result<(), DriverError> {
        self.mobile("mobile:dismissAlert", Value::Null, "Dismiss Alert").await
    }

    /// Swipes from the bottom of the screen to the top over three seconds.
    pub async fn scroll_to_location(&self) -> Result<(), DriverError> {
        let args = json!({
            "startX": 0.50,
            "startY": 0.95,
            "endX": 0.50,
            "endY": 0.01,
            "duration": 3.0,
        });
        self.mobile("mobile: swipe", args, "Scroll to location").await
    }

    // -----------------------------------------------------------------------
    // Device
    // -----------------------------------------------------------------------

    pub async fn set_orientation(&self, orientation: Orientation) -> Result<(), DriverError> {
        let result = self.session.rotate(orientation).await;
        self.outcome(
            result,
            || format!("Device Orientation is set to {orientation}"),
            || format!("Exception while setting orientation to {orientation}"),
        )
    }

    /// Backgrounds the app for ten seconds.
    pub async fn background_app(&self) -> Result<(), DriverError> {
        let result = self.session.background_app(BACKGROUND_DURATION).await;
        self.checked(result, || "Exception while backgrounding the app".to_string())
    }

    /// Dismisses the soft keyboard. A keyboard that is not shown is not an
    /// error, so failures are only logged.
    pub async fn hide_keyboard(&self) -> Result<(), DriverError> {
        if let Err(err) = self.session.hide_keyboard().await {
            debug!(%err, "hide keyboard ignored");
        }
        Ok(())
    }

    /// Toggles AC power where the platform supports it; a no-op elsewhere.
    ///
    /// `state` must be `ON` or `OFF`.
    pub async fn power_state_android(&self, state: &str) -> Result<(), DriverError> {
        let state: PowerState = match state.parse() {
            Ok(state) => state,
            Err(err) => {
                self.reporter().warning("Power state not available");
                return Err(err);
            }
        };
        if !self.session.controls().supports_power_ac() {
            return Ok(());
        }
        let result = self.session.set_power_ac(state).await;
        self.checked(result, || "Exception while setting power state".to_string())
    }

    /// Scrolls a horizontal Android list to the entry with `text` and clicks it.
    pub async fn scroll_click_android(&self, scrollable_list_id: &str, text: &str) -> Result<(), DriverError> {
        let result = self
            .session
            .scroll_into_view_and_click(scrollable_list_id, text)
            .await;
        self.outcome(
            result,
            || format!("Clicked on {text}"),
            || format!("Exception occurred when clicking on - {text}"),
        )
    }

    // -----------------------------------------------------------------------
    // Misc
    // -----------------------------------------------------------------------

    pub async fn wait_for_page_load(&self, seconds: u64) -> Result<(), DriverError> {
        self.session
            .set_page_load_timeout(Duration::from_secs(seconds))
            .await
    }

    /// Reports whether `items` is in natural (lexicographic) order.
    ///
    /// An empty list is reported as a warning and counts as unsorted.
    pub fn check_list_is_sorted<S: AsRef<str>>(&self, items: &[S]) -> bool {
        if items.is_empty() {
            self.reporter().warning("List is empty");
            return false;
        }
        let sorted = items.windows(2).all(|w| w[0].as_ref() <= w[1].as_ref());
        if sorted {
            self.reporter().pass("List is sorted");
        } else {
            self.reporter().info("List is not sorted");
        }
        sorted
    }
}
