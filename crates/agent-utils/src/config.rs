//! Environment-driven configuration helpers
//!
//! Configuration structs elsewhere in the workspace read their overrides through
//! [`parse_var`], which takes a lookup function instead of touching the process
//! environment directly. Tests pass a closure over a map; production code passes
//! [`env_lookup`].

use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was present but could not be parsed
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Look up a variable in the process environment
///
/// Unset and non-UTF-8 variables are both treated as absent.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Read and parse an optional configuration variable
///
/// Returns `Ok(None)` when the variable is absent or blank.
pub fn parse_var<T, F>(lookup: F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        })
}
