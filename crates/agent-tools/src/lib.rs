//! Tool management and execution framework
//!
//! This crate provides the [`Tool`] trait that LLM-callable functions implement
//! and a [`ToolRegistry`] that dispatches calls by name.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::{Tool, ToolDefinition};
