use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::HarnessError;

/// Supported browser targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// Google Chrome/Chromium
    Chrome,
    /// Mozilla Firefox
    Firefox,
}

impl FromStr for BrowserKind {
    type Err = HarnessError;

    /// Parse a browser kind from a configured string (case-insensitive)
    fn from_str(s: &str) -> Result<Self, HarnessError> {
        match s.to_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            other => Err(HarnessError::UnsupportedTarget(format!(
                "Unsupported browser type: {}",
                other
            ))),
        }
    }
}

impl BrowserKind {
    /// Driver executable expected under `<repo-root>/drivers/`
    pub fn driver_executable(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chromedriver",
            BrowserKind::Firefox => "geckodriver",
        }
    }

    /// Ports tried before asking the OS for a free one
    pub fn preferred_ports(&self) -> &'static [u16] {
        match self {
            BrowserKind::Chrome => &[9515, 9516, 9517],
            BrowserKind::Firefox => &[4444, 4445, 4446],
        }
    }
}

/// Named test environments a run may point at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestEnvironment {
    Qa,
    Stage,
    Dev,
}

impl FromStr for TestEnvironment {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, HarnessError> {
        match s.to_lowercase().as_str() {
            "qa" => Ok(TestEnvironment::Qa),
            "stage" => Ok(TestEnvironment::Stage),
            "dev" => Ok(TestEnvironment::Dev),
            other => Err(HarnessError::UnsupportedTarget(format!(
                "Unsupported environment: {}",
                other
            ))),
        }
    }
}

/// Browser viewport dimensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl ViewportSize {
    /// Parse viewport size from "WIDTHxHEIGHT" format (e.g., "1920x1080")
    pub fn parse(s: &str) -> Result<Self, HarnessError> {
        let parts: Vec<&str> = s.split('x').collect();
        if parts.len() != 2 {
            return Err(HarnessError::UnsupportedTarget(format!(
                "Invalid viewport '{}'. Use WIDTHxHEIGHT (e.g., 1920x1080)",
                s
            )));
        }

        let width = parts[0].parse::<u32>().map_err(|_| {
            HarnessError::UnsupportedTarget(format!("Invalid width in viewport '{}'", s))
        })?;
        let height = parts[1].parse::<u32>().map_err(|_| {
            HarnessError::UnsupportedTarget(format!("Invalid height in viewport '{}'", s))
        })?;

        Ok(ViewportSize { width, height })
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        ViewportSize {
            width: 1920,
            height: 1080,
        }
    }
}

/// Resolved harness configuration for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Browser to drive
    pub browser: BrowserKind,
    /// Environment the run points at
    pub environment: TestEnvironment,
    /// QA endpoint
    pub qa_url: String,
    /// STAGE endpoint (empty when the environment is not provisioned)
    pub stage_url: String,
    /// DEV endpoint (empty when the environment is not provisioned)
    pub dev_url: String,
    /// URI for the API smoke test
    pub api_uri: String,
    /// Whether to run the browser headless
    pub headless: bool,
    /// Window size applied after the session opens
    pub viewport: ViewportSize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            browser: BrowserKind::Chrome,
            environment: TestEnvironment::Qa,
            qa_url: "http://www.google.com".to_string(),
            stage_url: String::new(),
            dev_url: String::new(),
            api_uri: "https://jsonplaceholder.typicode.com/posts".to_string(),
            headless: true,
            viewport: ViewportSize::default(),
        }
    }
}

impl HarnessConfig {
    /// Build a configuration from defaults, overridden by `WEBHARNESS_*`
    /// environment variables where set.
    pub fn from_env() -> Result<Self, HarnessError> {
        let mut config = HarnessConfig::default();

        if let Ok(browser) = std::env::var("WEBHARNESS_BROWSER") {
            config.browser = browser.parse()?;
        }
        if let Ok(environment) = std::env::var("WEBHARNESS_ENVIRONMENT") {
            config.environment = environment.parse()?;
        }
        if let Ok(url) = std::env::var("WEBHARNESS_QA_URL") {
            config.qa_url = checked_url(url)?;
        }
        if let Ok(url) = std::env::var("WEBHARNESS_STAGE_URL") {
            config.stage_url = checked_url(url)?;
        }
        if let Ok(url) = std::env::var("WEBHARNESS_DEV_URL") {
            config.dev_url = checked_url(url)?;
        }
        if let Ok(uri) = std::env::var("WEBHARNESS_API_URI") {
            config.api_uri = checked_url(uri)?;
        }
        if let Ok(headless) = std::env::var("WEBHARNESS_HEADLESS") {
            config.headless = headless != "0" && !headless.eq_ignore_ascii_case("false");
        }
        if let Ok(viewport) = std::env::var("WEBHARNESS_VIEWPORT") {
            config.viewport = ViewportSize::parse(&viewport)?;
        }

        Ok(config)
    }

    /// Endpoint of the environment this run points at
    pub fn endpoint(&self) -> &str {
        match self.environment {
            TestEnvironment::Qa => &self.qa_url,
            TestEnvironment::Stage => &self.stage_url,
            TestEnvironment::Dev => &self.dev_url,
        }
    }

    /// Which configured environment a URL belongs to, if any. Empty endpoint
    /// strings never match, so an unprovisioned STAGE/DEV cannot be reached
    /// by accident.
    pub fn environment_for(&self, url: &str) -> Option<TestEnvironment> {
        if !self.qa_url.is_empty() && url == self.qa_url {
            Some(TestEnvironment::Qa)
        } else if !self.stage_url.is_empty() && url == self.stage_url {
            Some(TestEnvironment::Stage)
        } else if !self.dev_url.is_empty() && url == self.dev_url {
            Some(TestEnvironment::Dev)
        } else {
            None
        }
    }
}

// Endpoints are resolved at configuration load; a malformed override fails
// here rather than mid-run. Empty strings mark unprovisioned environments.
fn checked_url(value: String) -> Result<String, HarnessError> {
    if value.is_empty() {
        return Ok(value);
    }
    url::Url::parse(&value).map_err(|e| {
        HarnessError::UnsupportedTarget(format!("Invalid endpoint URL '{}': {}", value, e))
    })?;
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
