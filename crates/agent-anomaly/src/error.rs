//! Error types for anomaly detection operations

use thiserror::Error;

/// Anomaly detection specific errors
///
/// Shape errors abort the whole computation for a ticker. Per-metric problems
/// (no history, weak fit, zero expected value) are verdicts, not errors.
#[derive(Debug, Error)]
pub enum AnomalyError {
    /// A period label could not be parsed into quarter and year
    #[error("Malformed period {label:?}: {reason}. Expected format 'Q<1-4> YYYY' (e.g. 'Q3 2024')")]
    MalformedPeriod { label: String, reason: String },

    /// Fewer than two distinct periods were supplied
    #[error("Insufficient historical data: need at least 2 quarters of data for anomaly detection, found {found}")]
    InsufficientHistory { found: usize },

    /// Two labels normalized to the same period
    #[error("Duplicate period: {0} appears more than once")]
    DuplicatePeriod(String),

    /// The history source returned nothing for the request
    #[error("No financial data available for ticker {ticker} before period {period}")]
    DataUnavailable { ticker: String, period: String },

    /// The history source failed
    #[error("History source error: {0}")]
    SourceError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for anomaly operations
pub type Result<T> = std::result::Result<T, AnomalyError>;

impl From<agent_utils::ConfigError> for AnomalyError {
    fn from(err: agent_utils::ConfigError) -> Self {
        AnomalyError::ConfigError(err.to_string())
    }
}

/// Convert AnomalyError to agent_core::Error
impl From<AnomalyError> for agent_core::Error {
    fn from(err: AnomalyError) -> Self {
        match err {
            AnomalyError::MalformedPeriod { .. } => agent_core::Error::InvalidInput(err.to_string()),
            other => agent_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}
