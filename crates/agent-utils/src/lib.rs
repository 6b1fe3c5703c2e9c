//! Shared utilities for the anomaly workspace
//!
//! This crate provides logging setup and environment-driven configuration helpers
//! used across the workspace.

pub mod config;
pub mod logging;

pub use config::{ConfigError, env_lookup, parse_var};
pub use logging::{init_tracing, init_tracing_json, init_tracing_with};
