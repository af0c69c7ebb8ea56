use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::BrowserKind;

/// Directory probed for repo-local driver executables before falling back
/// to `PATH`.
pub const DRIVER_FOLDER: &str = "drivers";

/// Manages WebDriver processes (geckodriver, chromedriver) for the run
pub struct DriverManager {
    processes: Arc<Mutex<Vec<DriverProcess>>>,
}

struct DriverProcess {
    browser: BrowserKind,
    child: Child,
    port: u16,
    url: String,
    #[cfg(unix)]
    process_group_id: Option<i32>,
}

impl Default for DriverManager {
    fn default() -> Self {
        Self {
            processes: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl DriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a WebDriver is running for the given browser kind.
    /// Returns the URL to connect to.
    pub async fn ensure_driver(&self, browser: BrowserKind) -> Result<String> {
        let managed_urls: Vec<String> = {
            let processes = self.processes.lock().unwrap();
            processes
                .iter()
                .filter(|p| p.browser == browser)
                .map(|p| p.url.clone())
                .collect()
        };

        for url in managed_urls {
            if Self::is_driver_ready(&url).await {
                debug!("Reusing managed WebDriver at {}", url);
                return Ok(url);
            }
        }

        // Check standard ports for an externally managed driver
        for port in browser.preferred_ports() {
            let url = format!("http://localhost:{}", port);
            if Self::is_driver_ready(&url).await {
                debug!("Found external WebDriver at {}", url);
                return Ok(url);
            }
        }

        info!("WebDriver not detected, starting it");
        self.start_driver(browser).await
    }

    /// Resolve the driver executable: the repo-local `drivers/` copy wins,
    /// then whatever is on `PATH`.
    pub fn resolve_executable(browser: BrowserKind) -> Result<PathBuf> {
        let executable = browser.driver_executable();

        let local = Path::new(DRIVER_FOLDER).join(executable);
        if local.is_file() {
            debug!("Using repo-local driver at {}", local.display());
            return Ok(local);
        }

        if Self::command_exists(executable) {
            debug!("Using {} from PATH", executable);
            return Ok(PathBuf::from(executable));
        }

        anyhow::bail!(
            "{} not found under {}/ or on PATH. Please install it:\n\
              macOS: brew install {}\n\
              Linux: download from the official releases and place it in {}/",
            executable,
            DRIVER_FOLDER,
            executable,
            DRIVER_FOLDER
        )
    }

    /// Start a WebDriver process for the browser kind
    async fn start_driver(&self, browser: BrowserKind) -> Result<String> {
        let executable = Self::resolve_executable(browser)?;
        let port = Self::find_free_port(browser)?;

        info!(
            "Starting {} on port {}",
            browser.driver_executable(),
            port
        );

        let mut cmd = Command::new(&executable);
        match browser {
            BrowserKind::Firefox => {
                cmd.args(["--port".to_string(), port.to_string()]);
            }
            BrowserKind::Chrome => {
                cmd.arg(format!("--port={}", port));
            }
        }
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        // On Unix, a dedicated process group lets us kill the whole tree
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd
            .spawn()
            .context(format!("Failed to start {}", executable.display()))?;

        #[cfg(unix)]
        let process_group_id = Some(child.id() as i32);

        let url = format!("http://localhost:{}", port);

        {
            let mut processes = self.processes.lock().unwrap();
            processes.push(DriverProcess {
                browser,
                child,
                port,
                url: url.clone(),
                #[cfg(unix)]
                process_group_id,
            });
        }

        // Wait for the driver to report ready
        let max_attempts = 30;
        for attempt in 1..=max_attempts {
            if Self::is_driver_ready(&url).await {
                info!("WebDriver ready on port {}", port);
                return Ok(url);
            }
            if attempt < max_attempts {
                sleep(Duration::from_millis(100)).await;
            }
        }

        self.cleanup_failed_process(port);
        anyhow::bail!("WebDriver failed to start within timeout")
    }

    /// Check if a command exists in PATH
    pub fn command_exists(command: &str) -> bool {
        #[cfg(unix)]
        {
            Command::new("which")
                .arg(command)
                .output()
                .map(|output| output.status.success())
                .unwrap_or(false)
        }

        #[cfg(windows)]
        {
            Command::new("where")
                .arg(command)
                .output()
                .map(|output| output.status.success())
                .unwrap_or(false)
        }
    }

    /// Find a free port, trying the browser's conventional ones first
    pub fn find_free_port(browser: BrowserKind) -> Result<u16> {
        for &port in browser.preferred_ports() {
            if !Self::is_port_in_use(port) {
                debug!("Found free port {} for {:?}", port, browser);
                return Ok(port);
            }
            debug!("Port {} is in use for {:?}", port, browser);
        }

        // Fall back to letting the OS assign one
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        drop(listener);
        Ok(port)
    }

    /// Check if a port is in use
    pub fn is_port_in_use(port: u16) -> bool {
        std::net::TcpListener::bind(("127.0.0.1", port)).is_err()
    }

    /// Check that a WebDriver at `url` is up and reports ready
    pub async fn is_driver_ready(url: &str) -> bool {
        let status_url = format!("{}/status", url);

        match reqwest::Client::new()
            .get(&status_url)
            .timeout(Duration::from_secs(1))
            .send()
            .await
        {
            Ok(response) => {
                if !response.status().is_success() {
                    return false;
                }
                match response.json::<serde_json::Value>().await {
                    Ok(body) => body
                        .get("value")
                        .and_then(|v| v.get("ready"))
                        .and_then(|r| r.as_bool())
                        .unwrap_or(false),
                    Err(_) => false,
                }
            }
            Err(_) => false,
        }
    }

    /// Kill a process group on Unix systems
    #[cfg(unix)]
    fn kill_process_group(pgid: i32) {
        if let Err(e) = Command::new("kill")
            .args(["-TERM", &format!("-{}", pgid)])
            .output()
        {
            debug!("Failed to send SIGTERM to process group {}: {}", pgid, e);
        }

        std::thread::sleep(Duration::from_millis(100));

        if let Err(e) = Command::new("kill")
            .args(["-KILL", &format!("-{}", pgid)])
            .output()
        {
            debug!("Failed to send SIGKILL to process group {}: {}", pgid, e);
        }
    }

    /// Clean up a process whose driver never became ready
    fn cleanup_failed_process(&self, port: u16) {
        let mut processes = self.processes.lock().unwrap();
        if let Some(index) = processes.iter().position(|p| p.port == port) {
            let mut process = processes.remove(index);

            #[cfg(unix)]
            if let Some(pgid) = process.process_group_id {
                info!(
                    "Killing process group {} for failed WebDriver on port {}",
                    pgid, port
                );
                Self::kill_process_group(pgid);
            }

            let _ = process.child.kill();
        }
    }

    /// Stop all managed WebDriver processes
    pub fn stop_all(&self) {
        let mut processes = self.processes.lock().unwrap();
        for process in processes.iter_mut() {
            debug!("Stopping WebDriver on port {}", process.port);

            #[cfg(unix)]
            if let Some(pgid) = process.process_group_id {
                info!(
                    "Killing process group {} for WebDriver on port {}",
                    pgid, process.port
                );
                Self::kill_process_group(pgid);
            }

            let _ = process.child.kill();
        }
        processes.clear();
    }
}

impl Drop for DriverManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}

// Global driver manager instance
lazy_static::lazy_static! {
    pub static ref GLOBAL_DRIVER_MANAGER: DriverManager = DriverManager::new();
}

#[cfg(test)]
#[path = "driver_manager_test.rs"]
mod driver_manager_test;
