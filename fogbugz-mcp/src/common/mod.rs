//! Common utilities module
//!
//! Shared helpers used by configuration loading and the MCP layer.

/// Environment variable loading utilities
pub mod env_loader;

pub use env_loader::{load_env_nonempty, load_env_parsed, EnvLoader};
