//! Error types for agent-core

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by tools and the components that call them
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any work was attempted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Processing started but could not produce a result
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    /// No tool is registered under the requested name
    #[error("Tool not found: {0}")]
    ToolNotFound(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than by processing
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::ToolNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ToolNotFound("anomaly_detection".to_string());
        assert_eq!(err.to_string(), "Tool not found: anomaly_detection");

        let err = Error::ProcessingFailed("need at least 2 quarters".to_string());
        assert_eq!(err.to_string(), "Processing failed: need at least 2 quarters");
    }

    #[test]
    fn test_is_input_error() {
        assert!(Error::InvalidInput("bad".to_string()).is_input_error());
        assert!(Error::ToolNotFound("x".to_string()).is_input_error());
        assert!(!Error::ProcessingFailed("x".to_string()).is_input_error());
    }
}
