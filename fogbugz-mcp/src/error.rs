//! Unified error handling for the FogBugz MCP library
//!
//! Every fallible operation in the library returns [`Result`], whose error type
//! distinguishes configuration problems, transport failures, malformed API
//! responses and errors reported by FogBugz itself.

use crate::config::ConfigError;
use std::io;
use thiserror::Error;

/// The main error type for the FogBugz MCP library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FogBugzError {
    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP transport failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// FogBugz answered with a non-success HTTP status
    #[error("FogBugz returned HTTP {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL with the token redacted
        url: String,
    },

    /// Response body was not the XML shape we expect
    #[error("Failed to parse FogBugz XML response: {0}")]
    Xml(String),

    /// FogBugz reported an API error inside the XML envelope
    #[error("FogBugz API error {code}: {message}")]
    Api {
        /// FogBugz error code (3 = not logged on)
        code: i64,
        /// Message text from the `<error>` element
        message: String,
    },

    /// The requested wiki page does not exist
    #[error("No wikipage found for article_id={0}")]
    ArticleNotFound(i64),

    /// The documentation agent could not produce an answer
    #[error("Agent error: {0}")]
    Agent(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl FogBugzError {
    /// FogBugz error code for an invalid or expired token
    pub const NOT_LOGGED_ON: i64 = 3;

    /// Whether the error was caused by caller input or credentials rather than
    /// by the server or the network
    pub fn is_user_error(&self) -> bool {
        match self {
            FogBugzError::Config(_) | FogBugzError::ArticleNotFound(_) => true,
            FogBugzError::Api { code, .. } => *code == Self::NOT_LOGGED_ON,
            _ => false,
        }
    }
}

impl From<quick_xml::de::DeError> for FogBugzError {
    fn from(error: quick_xml::de::DeError) -> Self {
        FogBugzError::Xml(error.to_string())
    }
}

/// Result type alias for FogBugz MCP operations
pub type Result<T> = std::result::Result<T, FogBugzError>;
