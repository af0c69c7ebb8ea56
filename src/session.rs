use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tracing::{debug, error, info};

use crate::config::{BrowserKind, HarnessConfig};
use crate::driver_manager::GLOBAL_DRIVER_MANAGER;
use crate::errors::HarnessError;

/// Root directory for per-run artifact folders
pub const SCREENSHOT_FOLDER: &str = "screenshots";

/// One live browser automation session plus its per-run artifact directory.
///
/// Created by [`Session::open`], destroyed by [`Session::close`]. `close`
/// consumes the session, so a closed session cannot be touched again.
pub struct Session {
    client: Client,
    config: HarnessConfig,
    artifact_dir: PathBuf,
}

impl Session {
    /// Open a browser session for the configured target: ensure the driver
    /// process is running, connect, size the window, and create the run's
    /// artifact directory.
    pub async fn open(config: HarnessConfig) -> Result<Session, HarnessError> {
        info!("Opening browser: {:?}", config.browser);

        let webdriver_url = GLOBAL_DRIVER_MANAGER
            .ensure_driver(config.browser)
            .await
            .map_err(HarnessError::Other)?;

        debug!("Connecting to WebDriver at {}", webdriver_url);
        let client = ClientBuilder::rustls()
            .capabilities(Self::capabilities(&config))
            .connect(&webdriver_url)
            .await
            .map_err(|e| {
                HarnessError::Other(
                    anyhow::Error::new(e).context("Failed to connect to WebDriver"),
                )
            })?;

        // Window sizing is best-effort; headless targets may refuse it
        if let Err(e) = client
            .set_window_size(config.viewport.width, config.viewport.height)
            .await
        {
            debug!("Could not set window size: {}", e);
        }

        let artifact_dir = Self::create_artifact_dir().map_err(HarnessError::Other)?;
        info!("Run artifacts under {}", artifact_dir.display());

        Ok(Session {
            client,
            config,
            artifact_dir,
        })
    }

    /// Navigate to one of the configured environment endpoints.
    ///
    /// A URL outside the allowlist fails with `UnsupportedTarget` before any
    /// navigation is attempted. Transport failures are screenshotted and
    /// surfaced as `NavigationFailed` with the cause chained.
    pub async fn navigate(&self, url: &str) -> Result<(), HarnessError> {
        match self.config.environment_for(url) {
            Some(environment) => info!("Testing on {:?} environment", environment),
            None => {
                return Err(HarnessError::UnsupportedTarget(format!(
                    "Unsupported environment: {}",
                    url
                )));
            }
        }

        info!("Opening: {}", url);
        if let Err(e) = self.client.goto(url).await {
            error!("Navigation to {} failed", url);
            if let Err(shot) = self.screenshot("Session", "navigate").await {
                error!("Could not capture failure screenshot: {}", shot);
            }
            return Err(HarnessError::NavigationFailed {
                url: url.to_string(),
                cause: e.into(),
            });
        }

        Ok(())
    }

    /// Save a PNG of the current viewport into the run's artifact directory,
    /// tagged with the calling context and operation.
    pub async fn screenshot(
        &self,
        context: &str,
        operation: &str,
    ) -> Result<PathBuf, HarnessError> {
        let png = self
            .client
            .screenshot()
            .await
            .map_err(|e| HarnessError::Other(e.into()))?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = self
            .artifact_dir
            .join(format!("{}_{}_{}.png", context, operation, stamp));
        std::fs::write(&path, png)
            .context("Failed to write screenshot")
            .map_err(HarnessError::Other)?;

        info!("Screenshot saved in path: {}", path.display());
        Ok(path)
    }

    /// Title of the current window
    pub async fn window_title(&self) -> Result<String, HarnessError> {
        let title = self
            .client
            .execute("return document.title;", vec![])
            .await
            .map_err(|e| HarnessError::Other(e.into()))?;
        Ok(title.as_str().unwrap_or_default().to_string())
    }

    /// Close the session and quit the browser
    pub async fn close(self) -> Result<(), HarnessError> {
        info!("Closing the session and the browser");
        self.client
            .close()
            .await
            .map_err(|e| HarnessError::Other(e.into()))?;
        Ok(())
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn browser(&self) -> BrowserKind {
        self.config.browser
    }

    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    fn capabilities(config: &HarnessConfig) -> serde_json::Map<String, serde_json::Value> {
        let mut caps = serde_json::Map::new();

        match config.browser {
            BrowserKind::Firefox => {
                let mut args = Vec::new();
                if config.headless {
                    args.push("--headless".to_string());
                }
                args.push(format!("--width={}", config.viewport.width));
                args.push(format!("--height={}", config.viewport.height));
                caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
            BrowserKind::Chrome => {
                let mut args = vec!["--no-sandbox".to_string()];
                if config.headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }
                args.push(format!(
                    "--window-size={},{}",
                    config.viewport.width, config.viewport.height
                ));
                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
        }

        caps
    }

    fn create_artifact_dir() -> anyhow::Result<PathBuf> {
        let run_name = Local::now().format("run_%Y-%m-%d_%H_%M_%S").to_string();
        let dir = Path::new(SCREENSHOT_FOLDER).join(run_name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create artifact directory {}", dir.display()))?;
        Ok(dir)
    }
}
