//! Shared utilities for MCP operations
//!
//! Error mapping and argument validation used by every tool handler.

use crate::error::FogBugzError;
use rmcp::Error as McpError;

/// Common error handling patterns for MCP operations
pub struct McpErrorHandler;

impl McpErrorHandler {
    /// Convert a library error to an MCP error
    ///
    /// Errors the caller can fix (unknown article, bad token, bad config) map to
    /// `invalid_params`; transport and parsing failures map to `internal_error`.
    pub fn handle_error(error: FogBugzError, operation: &str) -> McpError {
        tracing::error!("MCP operation '{}' failed: {}", operation, error);

        match error {
            FogBugzError::ArticleNotFound(_) | FogBugzError::Config(_) => {
                McpError::invalid_params(error.to_string(), None)
            }
            FogBugzError::Api { code, message } if code == FogBugzError::NOT_LOGGED_ON => {
                McpError::invalid_params(
                    format!("FogBugz rejected the API token: {message}"),
                    None,
                )
            }
            other => McpError::internal_error(other.to_string(), None),
        }
    }

    /// Map the error side of a result
    pub fn handle_result<T>(
        result: crate::Result<T>,
        operation: &str,
    ) -> std::result::Result<T, McpError> {
        result.map_err(|e| Self::handle_error(e, operation))
    }
}

/// Argument validation helpers
pub struct McpValidation;

impl McpValidation {
    /// Reject empty or whitespace-only strings
    pub fn validate_not_empty(value: &str, field: &str) -> std::result::Result<(), McpError> {
        if value.trim().is_empty() {
            return Err(McpError::invalid_params(
                format!("{field} must not be empty"),
                None,
            ));
        }
        Ok(())
    }

    /// Reject ids that FogBugz can never have
    pub fn validate_id(value: i64, field: &str) -> std::result::Result<(), McpError> {
        if value <= 0 {
            return Err(McpError::invalid_params(
                format!("{field} must be a positive integer, got {value}"),
                None,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn test_user_errors_map_to_invalid_params() {
        let error = McpErrorHandler::handle_error(FogBugzError::ArticleNotFound(7), "view");
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(error.message, "No wikipage found for article_id=7");

        let error = McpErrorHandler::handle_error(
            FogBugzError::Api {
                code: 3,
                message: "Not logged in".to_string(),
            },
            "list",
        );
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
        assert!(error.message.contains("token"));
    }

    #[test]
    fn test_system_errors_map_to_internal_error() {
        let error = McpErrorHandler::handle_error(
            FogBugzError::Xml("unexpected end".to_string()),
            "list",
        );
        assert_eq!(error.code, ErrorCode::INTERNAL_ERROR);

        let error = McpErrorHandler::handle_error(
            FogBugzError::Status {
                status: 500,
                url: "https://fb/api.asp".to_string(),
            },
            "list",
        );
        assert_eq!(error.code, ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn test_validation() {
        assert!(McpValidation::validate_not_empty("deploy", "query").is_ok());
        assert!(McpValidation::validate_not_empty("  ", "query").is_err());
        assert!(McpValidation::validate_id(12, "article_id").is_ok());
        assert!(McpValidation::validate_id(0, "article_id").is_err());
    }
}
