//! Environment variable loading utilities
//!
//! This module provides common patterns for loading environment variables
//! with type conversion and fallback defaults.

use std::env;
use std::str::FromStr;

/// Load an environment variable, treating unset and blank values the same
pub fn load_env_nonempty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Load an environment variable with type conversion
///
/// Values that fail to parse are ignored with a warning.
pub fn load_env_parsed<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    let raw = load_env_nonempty(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparsable value for {}: {:?}", key, raw);
            None
        }
    }
}

/// Builder for loading multiple environment variables with consistent prefix
#[derive(Debug)]
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    /// Create a new environment loader with the given prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }

    /// Load a non-empty string value
    pub fn load_optional(&self, suffix: &str) -> Option<String> {
        load_env_nonempty(&self.key(suffix))
    }

    /// Load a parsed value
    pub fn load_parsed<T>(&self, suffix: &str) -> Option<T>
    where
        T: FromStr,
    {
        load_env_parsed(&self.key(suffix))
    }
}
