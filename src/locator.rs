use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Token substituted by [`Locator::bind`] in parameterized locators.
pub const PLACEHOLDER: &str = "<REPLACE>";

/// Selector strategy understood by the WebDriver protocol
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Css => "css",
            Strategy::XPath => "xpath",
        }
    }
}

/// An immutable strategy + selector pair identifying zero or more elements
/// on a rendered page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    /// Selector strategy (CSS or XPath)
    pub strategy: Strategy,
    /// Selector string; never empty
    pub selector: String,
}

impl Locator {
    /// Create a CSS locator
    pub fn css(selector: impl Into<String>) -> Self {
        let selector = selector.into();
        debug_assert!(!selector.is_empty(), "locator selector must be non-empty");
        Locator {
            strategy: Strategy::Css,
            selector,
        }
    }

    /// Create an XPath locator
    pub fn xpath(selector: impl Into<String>) -> Self {
        let selector = selector.into();
        debug_assert!(!selector.is_empty(), "locator selector must be non-empty");
        Locator {
            strategy: Strategy::XPath,
            selector,
        }
    }

    /// Whether this locator carries a `<REPLACE>` token to be bound at call time
    pub fn has_placeholder(&self) -> bool {
        self.selector.contains(PLACEHOLDER)
    }

    /// Return a new locator with every `<REPLACE>` occurrence substituted by
    /// `text`. The receiver is left untouched.
    pub fn bind(&self, text: &str) -> Locator {
        debug!("Binding locator {} with '{}'", self, text);
        Locator {
            strategy: self.strategy,
            selector: self.selector.replace(PLACEHOLDER, text),
        }
    }

    /// View this locator as the fantoccini equivalent
    pub fn as_webdriver(&self) -> fantoccini::Locator<'_> {
        match self.strategy {
            Strategy::Css => fantoccini::Locator::Css(&self.selector),
            Strategy::XPath => fantoccini::Locator::XPath(&self.selector),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.as_str(), self.selector)
    }
}

/// Named locators for one page, passed explicitly to its page helper
#[derive(Clone, Debug, Default)]
pub struct LocatorRegistry {
    entries: HashMap<String, Locator>,
}

impl LocatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a locator under a logical name, replacing any previous entry
    pub fn insert(&mut self, name: impl Into<String>, locator: Locator) {
        self.entries.insert(name.into(), locator);
    }

    /// Look up a locator by logical name
    pub fn get(&self, name: &str) -> Option<&Locator> {
        self.entries.get(name)
    }

    /// Look up a locator by logical name, failing if it was never registered.
    /// A missing entry is a harness configuration bug, not a page condition.
    pub fn require(&self, name: &str) -> Result<&Locator> {
        self.entries
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("No locator registered under '{}'", name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod locator_test;
