use std::fmt;

/// Failure taxonomy surfaced by every harness operation, with process exit
/// codes for the CLI. Page helpers match on these categories instead of the
/// WebDriver client's own error hierarchy.
#[derive(Debug)]
pub enum HarnessError {
    /// No element resolved for a locator (exit code 2)
    ElementNotFound { name: String, cause: anyhow::Error },
    /// Element resolved but refused the interaction (exit code 3)
    ElementNotInteractable { name: String, cause: anyhow::Error },
    /// A bounded wait expired (exit code 4)
    Timeout { name: String, seconds: u64 },
    /// URL navigation failed at the transport/browser level (exit code 5)
    NavigationFailed { url: String, cause: anyhow::Error },
    /// Invalid browser or environment selection (exit code 6)
    UnsupportedTarget(String),
    /// API client transport or decode failure (exit code 7)
    Transport { uri: String, cause: anyhow::Error },
    /// Generic error (exit code 1)
    Other(anyhow::Error),
}

impl HarnessError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::ElementNotFound { .. } => 2,
            HarnessError::ElementNotInteractable { .. } => 3,
            HarnessError::Timeout { .. } => 4,
            HarnessError::NavigationFailed { .. } => 5,
            HarnessError::UnsupportedTarget(_) => 6,
            HarnessError::Transport { .. } => 7,
            HarnessError::Other(_) => 1,
        }
    }

    /// Categorize a failed WebDriver command against the element `name` it
    /// targeted. fantoccini surfaces protocol errors by message, so this
    /// classifies on the formatted error text.
    pub fn from_webdriver(name: &str, err: fantoccini::error::CmdError) -> Self {
        let msg = err.to_string().to_lowercase();

        if msg.contains("no such element") || msg.contains("unable to locate element") {
            HarnessError::ElementNotFound {
                name: name.to_string(),
                cause: err.into(),
            }
        } else if msg.contains("not interactable") || msg.contains("element not visible") {
            HarnessError::ElementNotInteractable {
                name: name.to_string(),
                cause: err.into(),
            }
        } else {
            HarnessError::Other(err.into())
        }
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::ElementNotFound { name, cause } => {
                write!(f, "No element found for '{}': {}", name, cause)
            }
            HarnessError::ElementNotInteractable { name, cause } => {
                write!(f, "Element '{}' is not interactable: {}", name, cause)
            }
            HarnessError::Timeout { name, seconds } => {
                write!(f, "Timed out after {}s waiting for '{}'", seconds, name)
            }
            HarnessError::NavigationFailed { url, cause } => {
                write!(f, "Navigation to '{}' failed: {}", url, cause)
            }
            HarnessError::UnsupportedTarget(msg) => write!(f, "{}", msg),
            HarnessError::Transport { uri, cause } => {
                write!(f, "Request to '{}' failed: {}", uri, cause)
            }
            HarnessError::Other(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarnessError::ElementNotFound { cause, .. }
            | HarnessError::ElementNotInteractable { cause, .. }
            | HarnessError::NavigationFailed { cause, .. }
            | HarnessError::Transport { cause, .. } => Some(cause.as_ref()),
            HarnessError::Other(err) => Some(err.as_ref()),
            HarnessError::Timeout { .. } | HarnessError::UnsupportedTarget(_) => None,
        }
    }
}

impl From<anyhow::Error> for HarnessError {
    fn from(err: anyhow::Error) -> Self {
        HarnessError::Other(err)
    }
}

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;
