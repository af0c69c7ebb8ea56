//! # webharness
//!
//! Browser-driven UI smoke-test harness: a WebDriver client wrapped with
//! logging, screenshot capture, and raise-or-sentinel failure policies,
//! plus a page-object layer for a search engine's UI and a one-call REST
//! client for a JSON API smoke test.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Search and print the complementary result title
//! webharness search "ducks"
//!
//! # Verify a specific result link is present
//! webharness verify-link "Duck - Wikipedia"
//!
//! # Count Wikipedia links in the results
//! webharness count-wiki-links "ducks"
//!
//! # Run the JSON API smoke test
//! webharness api-check
//!
//! # Drive Firefox against the DEV environment, with a visible window
//! webharness --browser firefox --environment dev --no-headless search "ducks"
//! ```
//!
//! Results are emitted as JSON on stdout; logs go to stderr and to
//! `logs/debug.log`. Failed steps leave a PNG under `screenshots/<run>/`.
//!
//! ## Library Usage
//!
//! ```no_run
//! use webharness::{ActionWrapper, HarnessConfig, SearchPage, Session, search_locators};
//!
//! # async fn example() -> Result<(), webharness::HarnessError> {
//! let config = HarnessConfig::from_env()?;
//! let session = Session::open(config).await?;
//! let endpoint = session.config().endpoint().to_string();
//! session.navigate(&endpoint).await?;
//!
//! let page = SearchPage::new(ActionWrapper::new(session), search_locators());
//! let title = page.search_for("ducks").await;
//! assert!(!title.is_empty());
//! page.close().await?;
//! # Ok(())
//! # }
//! ```

/// Uniform action wrapper over raw element interactions
pub mod actions;

/// One-call REST client for the API smoke test
pub mod api;

/// Browser kind, environments, and run configuration
pub mod config;

/// WebDriver process management
pub mod driver_manager;

/// Failure taxonomy and exit codes
pub mod errors;

/// Locator value objects and registries
pub mod locator;

/// Process-wide logging sink
pub mod logging;

/// Page helper for the search flow
pub mod search_page;

/// Browser session lifecycle and artifacts
pub mod session;

pub use actions::{ActionWrapper, WAIT};
pub use api::ApiClient;
pub use config::{BrowserKind, HarnessConfig, TestEnvironment, ViewportSize};
pub use errors::HarnessError;
pub use locator::{Locator, LocatorRegistry, Strategy};
pub use search_page::{SearchPage, search_locators};
pub use session::Session;
