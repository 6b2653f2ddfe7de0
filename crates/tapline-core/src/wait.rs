//! Explicit waits on element state.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::element::Element;
use crate::error::DriverError;

/// Interval between state polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Condition an element must reach before it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Displayed and enabled.
    Clickable,
    /// Exists in the page. A located handle already satisfies this.
    Present,
    /// Displayed.
    Visible,
    /// Do not wait.
    None,
}

impl fmt::Display for WaitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WaitStrategy::Clickable => "clickable",
            WaitStrategy::Present => "present",
            WaitStrategy::Visible => "visible",
            WaitStrategy::None => "none",
        };
        f.write_str(name)
    }
}

async fn condition_holds(element: &Element<'_>, strategy: WaitStrategy) -> Result<bool, DriverError> {
    match strategy {
        WaitStrategy::Present | WaitStrategy::None => Ok(true),
        WaitStrategy::Visible => element.is_displayed().await,
        WaitStrategy::Clickable => Ok(element.is_displayed().await? && element.is_enabled().await?),
    }
}

/// Waits until `element` satisfies `strategy`, polling every [`POLL_INTERVAL`].
///
/// Transient lookup errors while polling are retried until the deadline;
/// the last one is discarded in favour of [`DriverError::WaitTimeout`].
pub async fn wait_for<'e, 's>(
    element: &'e Element<'s>,
    strategy: WaitStrategy,
    timeout: Duration,
) -> Result<&'e Element<'s>, DriverError> {
    if matches!(strategy, WaitStrategy::None | WaitStrategy::Present) {
        return Ok(element);
    }

    let deadline = Instant::now() + timeout;
    loop {
        match condition_holds(element, strategy).await {
            Ok(true) => return Ok(element),
            Ok(false) => {}
            Err(err) => debug!(%err, %strategy, "wait poll failed"),
        }
        if Instant::now() >= deadline {
            return Err(DriverError::WaitTimeout {
                condition: format!("{element} to be {strategy}"),
                timeout,
            });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
