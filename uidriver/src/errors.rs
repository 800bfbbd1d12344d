use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutomationError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Element is not visible: {0}")]
    ElementNotVisible(String),

    #[error("Timed out after {elapsed_ms}ms (budget {timeout_ms}ms) waiting for element {condition}")]
    Timeout {
        /// Human-readable description of the awaited condition,
        /// e.g. `text="Save" to appear`.
        condition: String,
        elapsed_ms: u64,
        timeout_ms: u64,
    },

    #[error("Platform-specific error: {0}")]
    PlatformError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl AutomationError {
    /// True for the "no matching node" failure that `has`-style queries fold
    /// into `false`. Every other variant is a genuine error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AutomationError::ElementNotFound(_))
    }
}
