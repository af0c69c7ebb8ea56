use std::path::PathBuf;
use std::time::Duration;

use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use serde_json::json;
use tracing::{debug, error, info};

use crate::errors::HarnessError;
use crate::locator::Locator;
use crate::session::Session;

/// Default bound for the blocking waits, in seconds
pub const WAIT: u64 = 60;

/// Interval between presence/visibility checks while waiting
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// WebDriver key code for ENTER
const ENTER_KEY: &str = "\u{e007}";

// Both scripts resolve the element in-page so CSS and XPath locators go
// through the same path.
const HIGHLIGHT_SCRIPT: &str = r#"
    var strategy = arguments[0];
    var selector = arguments[1];
    var style = arguments[2];
    var el = strategy === 'css'
        ? document.querySelector(selector)
        : document.evaluate(selector, document, null,
              XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;
    if (el) {
        el.setAttribute('style', (el.getAttribute('style') || '') + '; ' + style);
    }
"#;

const SCROLL_SCRIPT: &str = r#"
    var strategy = arguments[0];
    var selector = arguments[1];
    var el = strategy === 'css'
        ? document.querySelector(selector)
        : document.evaluate(selector, document, null,
              XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;
    if (el) { el.scrollIntoView(true); }
"#;

/// Uniform, loggable, fail-safe layer over raw element interactions.
///
/// Every operation follows the same contract: log intent, resolve the
/// locator against the live [`Session`], act, and on failure capture a
/// screenshot then either return the categorized [`HarnessError`]
/// (`raise_on_failure = true`, the convention at every call site that does
/// not say otherwise) or swallow it into the operation's sentinel value.
/// Page helpers never touch the WebDriver client directly.
pub struct ActionWrapper {
    session: Session,
}

impl ActionWrapper {
    pub fn new(session: Session) -> Self {
        ActionWrapper { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Navigate the underlying session to a configured environment endpoint
    pub async fn navigate(&self, url: &str) -> Result<(), HarnessError> {
        self.session.navigate(url).await
    }

    /// Capture a screenshot tagged with the caller's context and operation
    pub async fn screenshot(
        &self,
        context: &str,
        operation: &str,
    ) -> Result<PathBuf, HarnessError> {
        self.session.screenshot(context, operation).await
    }

    /// Close the underlying session and quit the browser
    pub async fn close(self) -> Result<(), HarnessError> {
        self.session.close().await
    }

    /// Click on an element.
    ///
    /// Returns `true` on success; with `raise_on_failure` unset a failed
    /// click becomes `false`.
    pub async fn click(
        &self,
        locator: &Locator,
        name: &str,
        raise_on_failure: bool,
    ) -> Result<bool, HarnessError> {
        info!("click on '{}'", name);
        debug!("{}", locator);

        match self.try_click(locator).await {
            Ok(()) => {
                info!("click success");
                Ok(true)
            }
            Err(e) => {
                self.fail("click", HarnessError::from_webdriver(name, e), raise_on_failure, true, false)
                    .await
            }
        }
    }

    /// Get an element handle. Sentinel on non-raising failure: `None`.
    pub async fn get_element(
        &self,
        locator: &Locator,
        name: &str,
        raise_on_failure: bool,
        log_error: bool,
    ) -> Result<Option<Element>, HarnessError> {
        info!("get_element '{}'", name);

        match self.find(locator).await {
            Ok(element) => Ok(Some(element)),
            Err(e) => {
                self.fail(
                    "get_element",
                    HarnessError::from_webdriver(name, e),
                    raise_on_failure,
                    log_error,
                    None,
                )
                .await
            }
        }
    }

    /// Get every element matching the locator. A locator matching nothing
    /// yields an empty sequence, not a failure.
    pub async fn get_elements(
        &self,
        locator: &Locator,
        name: &str,
        raise_on_failure: bool,
        log_error: bool,
    ) -> Result<Vec<Element>, HarnessError> {
        info!("get_elements '{}'", name);

        match self.find_all(locator).await {
            Ok(elements) => Ok(elements),
            Err(e) => {
                self.fail(
                    "get_elements",
                    HarnessError::from_webdriver(name, e),
                    raise_on_failure,
                    log_error,
                    Vec::new(),
                )
                .await
            }
        }
    }

    /// Is an element displayed on the page?
    ///
    /// Both "no such element" and "present but hidden" are failing
    /// preconditions; `raise_on_failure` decides between an error and the
    /// `false` sentinel for either.
    pub async fn is_displayed(
        &self,
        locator: &Locator,
        name: &str,
        raise_on_failure: bool,
        log_error: bool,
    ) -> Result<bool, HarnessError> {
        info!("Verifying element '{}'", name);
        debug!("{}", locator);

        match self.try_is_displayed(locator).await {
            Ok(true) => {
                self.highlight(locator, "green", "red", "2px", "solid").await;
                info!("'{}' is displayed", name);
                Ok(true)
            }
            Ok(false) => {
                info!("'{}' is not displayed", name);
                self.fail(
                    "is_displayed",
                    HarnessError::ElementNotInteractable {
                        name: name.to_string(),
                        cause: anyhow::anyhow!("element '{}' is not displayed", name),
                    },
                    raise_on_failure,
                    log_error,
                    false,
                )
                .await
            }
            Err(e) => {
                self.fail(
                    "is_displayed",
                    HarnessError::from_webdriver(name, e),
                    raise_on_failure,
                    log_error,
                    false,
                )
                .await
            }
        }
    }

    /// Scroll the page until the element is in view
    pub async fn scroll_into_view(
        &self,
        locator: &Locator,
        name: &str,
        raise_on_failure: bool,
    ) -> Result<bool, HarnessError> {
        info!("Scrolling to '{}'", name);
        debug!("{}", locator);

        match self.try_scroll_into_view(locator).await {
            Ok(()) => {
                self.highlight(locator, "green", "blue", "2.5px", "solid").await;
                info!("scroll_into_view success");
                Ok(true)
            }
            Err(e) => {
                self.fail(
                    "scroll_into_view",
                    HarnessError::from_webdriver(name, e),
                    raise_on_failure,
                    true,
                    false,
                )
                .await
            }
        }
    }

    /// Send key presses to an element, clearing any existing text first
    pub async fn type_text(
        &self,
        locator: &Locator,
        text: &str,
        name: &str,
        raise_on_failure: bool,
    ) -> Result<bool, HarnessError> {
        info!("type '{}' into '{}'", text, name);
        debug!("{}", locator);

        match self.try_type(locator, text).await {
            Ok(()) => {
                info!("type success");
                Ok(true)
            }
            Err(e) => {
                self.fail("type", HarnessError::from_webdriver(name, e), raise_on_failure, true, false)
                    .await
            }
        }
    }

    /// Read the text of a displayed element. Sentinel on non-raising
    /// failure: `None`. A present-but-hidden element is a failing
    /// precondition, same as [`ActionWrapper::is_displayed`].
    pub async fn get_text(
        &self,
        locator: &Locator,
        name: &str,
        raise_on_failure: bool,
        log_error: bool,
    ) -> Result<Option<String>, HarnessError> {
        info!("get_text of element '{}'", name);
        debug!("{}", locator);

        match self.try_get_text(locator, name).await {
            Ok(text) => {
                info!("Text is: '{}'", text);
                Ok(Some(text))
            }
            Err(err) => self.fail("get_text", err, raise_on_failure, log_error, None).await,
        }
    }

    /// Press the ENTER key on an element
    pub async fn press_enter(
        &self,
        locator: &Locator,
        name: &str,
        raise_on_failure: bool,
    ) -> Result<bool, HarnessError> {
        info!("press ENTER on '{}'", name);

        match self.try_press_enter(locator).await {
            Ok(()) => {
                info!("press_enter success");
                Ok(true)
            }
            Err(e) => {
                self.fail(
                    "press_enter",
                    HarnessError::from_webdriver(name, e),
                    raise_on_failure,
                    true,
                    false,
                )
                .await
            }
        }
    }

    /// Wait until an element is present in the page.
    ///
    /// Polls every 500 ms up to `seconds`; expiry is always a
    /// [`HarnessError::Timeout`], there is no sentinel path.
    pub async fn wait_for_present(
        &self,
        locator: &Locator,
        name: &str,
        seconds: u64,
    ) -> Result<bool, HarnessError> {
        info!("wait_for_present: '{}'", name);

        let deadline = tokio::time::Instant::now() + Duration::from_secs(seconds);
        loop {
            if self.find(locator).await.is_ok() {
                self.highlight(locator, "yellow", "blue", "2px", "solid").await;
                info!("wait_for_present '{}' successful", name);
                return Ok(true);
            }
            if tokio::time::Instant::now() >= deadline {
                return self.wait_expired(name, seconds).await;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Wait until an element is present and displayed
    pub async fn wait_until_visible(
        &self,
        locator: &Locator,
        name: &str,
        seconds: u64,
    ) -> Result<bool, HarnessError> {
        info!("wait_until_visible: '{}'", name);

        let deadline = tokio::time::Instant::now() + Duration::from_secs(seconds);
        loop {
            if self.currently_displayed(locator).await {
                self.highlight(locator, "yellow", "blue", "2px", "solid").await;
                info!("wait_until_visible '{}' successful", name);
                return Ok(true);
            }
            if tokio::time::Instant::now() >= deadline {
                return self.wait_expired(name, seconds).await;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Wait until an element disappears from the page.
    ///
    /// Idempotent: an element that is already absent or hidden succeeds
    /// after a single check, without polling.
    pub async fn wait_until_gone(
        &self,
        locator: &Locator,
        name: &str,
        seconds: u64,
    ) -> Result<bool, HarnessError> {
        info!("wait_until_gone: '{}'", name);

        if !self.currently_displayed(locator).await {
            info!("'{}' is already gone", name);
            return Ok(true);
        }

        let deadline = tokio::time::Instant::now() + Duration::from_secs(seconds);
        loop {
            tokio::time::sleep(POLL_INTERVAL).await;
            if !self.currently_displayed(locator).await {
                info!("wait_until_gone '{}' successful", name);
                return Ok(true);
            }
            if tokio::time::Instant::now() >= deadline {
                return self.wait_expired(name, seconds).await;
            }
        }
    }

    /// Delay for N seconds
    pub async fn delay_for(&self, seconds: u64) {
        info!("Sleeping for {} secs", seconds);
        tokio::time::sleep(Duration::from_secs(seconds)).await;
    }

    /// Wait for 3 seconds
    pub async fn short_delay(&self) {
        self.delay_for(3).await;
    }

    /// Wait for 10 seconds
    pub async fn long_delay(&self) {
        self.delay_for(10).await;
    }

    /// Bind a parameterized locator's token to `replacement`, logging the
    /// substitution. Pure apart from the log line.
    pub fn bind_locator(&self, locator: &Locator, replacement: &str) -> Locator {
        info!("Binding '{}' into {}", replacement, locator);
        locator.bind(replacement)
    }

    //
    // INTERNAL
    //

    async fn find(&self, locator: &Locator) -> Result<Element, CmdError> {
        self.session.client().find(locator.as_webdriver()).await
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Element>, CmdError> {
        self.session.client().find_all(locator.as_webdriver()).await
    }

    async fn try_click(&self, locator: &Locator) -> Result<(), CmdError> {
        let element = self.find(locator).await?;
        self.highlight(locator, "yellow", "red", "2.5px", "dashed").await;
        element.click().await?;
        Ok(())
    }

    async fn try_is_displayed(&self, locator: &Locator) -> Result<bool, CmdError> {
        let element = self.find(locator).await?;
        element.is_displayed().await
    }

    async fn try_scroll_into_view(&self, locator: &Locator) -> Result<(), CmdError> {
        // Resolve first so a missing element fails before the script runs
        self.find(locator).await?;
        self.highlight(locator, "yellow", "blue", "2.5px", "dashed").await;
        self.session
            .client()
            .execute(
                SCROLL_SCRIPT,
                vec![json!(locator.strategy.as_str()), json!(locator.selector)],
            )
            .await?;
        tokio::time::sleep(Duration::from_secs(1)).await;
        Ok(())
    }

    async fn try_type(&self, locator: &Locator, text: &str) -> Result<(), CmdError> {
        let element = self.find(locator).await?;
        self.highlight(locator, "yellow", "blue", "2.5px", "dashed").await;
        // Clear existing text before typing
        element.clear().await?;
        element.send_keys(text).await?;
        self.highlight(locator, "green", "blue", "2.5px", "solid").await;
        Ok(())
    }

    async fn try_get_text(&self, locator: &Locator, name: &str) -> Result<String, HarnessError> {
        let element = self
            .find(locator)
            .await
            .map_err(|e| HarnessError::from_webdriver(name, e))?;

        let displayed = element
            .is_displayed()
            .await
            .map_err(|e| HarnessError::from_webdriver(name, e))?;
        if !displayed {
            return Err(HarnessError::ElementNotInteractable {
                name: name.to_string(),
                cause: anyhow::anyhow!("element '{}' is not displayed", name),
            });
        }

        self.highlight(locator, "blue", "red", "2px", "dashed").await;
        element
            .text()
            .await
            .map_err(|e| HarnessError::from_webdriver(name, e))
    }

    async fn try_press_enter(&self, locator: &Locator) -> Result<(), CmdError> {
        let element = self.find(locator).await?;
        element.send_keys(ENTER_KEY).await?;
        Ok(())
    }

    async fn currently_displayed(&self, locator: &Locator) -> bool {
        match self.find(locator).await {
            Ok(element) => element.is_displayed().await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Transient visual highlight. Best-effort: a script failure is logged
    /// at debug level and never fails the surrounding operation.
    async fn highlight(
        &self,
        locator: &Locator,
        border_color: &str,
        font_color: &str,
        thickness: &str,
        border_style: &str,
    ) {
        let style = format!(
            "border: {} {} {}; color: {}; font-weight: bold;",
            thickness, border_style, border_color, font_color
        );
        let args = vec![
            json!(locator.strategy.as_str()),
            json!(locator.selector),
            json!(style),
        ];

        if let Err(e) = self.session.client().execute(HIGHLIGHT_SCRIPT, args).await {
            debug!("highlight failed: {}", e);
        }
    }

    /// Shared failure path: log, screenshot, then raise or swallow into the
    /// operation's sentinel.
    async fn fail<T>(
        &self,
        operation: &str,
        err: HarnessError,
        raise_on_failure: bool,
        log_error: bool,
        sentinel: T,
    ) -> Result<T, HarnessError> {
        error!("{} failed", operation);

        if let Err(shot) = self.session.screenshot("ActionWrapper", operation).await {
            error!("Could not capture failure screenshot: {}", shot);
        }

        if raise_on_failure {
            return Err(err);
        }
        if log_error {
            error!("{}", err);
        }
        Ok(sentinel)
    }

    async fn wait_expired<T>(&self, name: &str, seconds: u64) -> Result<T, HarnessError> {
        error!("timed out waiting for '{}'", name);

        if let Err(shot) = self.session.screenshot("ActionWrapper", "wait").await {
            error!("Could not capture failure screenshot: {}", shot);
        }

        Err(HarnessError::Timeout {
            name: name.to_string(),
            seconds,
        })
    }
}
