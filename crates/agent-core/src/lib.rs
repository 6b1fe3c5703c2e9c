//! Core types shared across the anomaly workspace
//!
//! This crate defines the error type that tools report back to their callers.

pub mod error;

pub use error::{Error, Result};
