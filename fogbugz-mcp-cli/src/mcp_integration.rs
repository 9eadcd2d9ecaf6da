//! Integration layer for calling MCP tools from CLI commands
//!
//! The documentation commands run the same tools the MCP server exposes, so
//! command-line output and MCP responses never drift apart.

use fogbugz_mcp::{Config, McpServer};
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde_json::Map;

use crate::error::CliResult;

/// CLI-specific tool context that can execute MCP tools
pub struct CliToolContext {
    server: McpServer,
}

impl CliToolContext {
    /// Load configuration from the environment and connect to FogBugz
    pub fn new() -> CliResult<Self> {
        let config = Config::load()?;
        Self::from_config(&config)
    }

    /// Build a context for an already loaded configuration
    pub fn from_config(config: &Config) -> CliResult<Self> {
        Ok(Self::from_server(McpServer::new(config)?))
    }

    /// Wrap an existing server
    pub fn from_server(server: McpServer) -> Self {
        Self { server }
    }

    /// Execute an MCP tool with the given arguments
    pub async fn execute_tool(
        &self,
        tool_name: &str,
        arguments: Map<String, serde_json::Value>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!("CLI calling tool {}", tool_name);
        self.server.execute_tool(tool_name, arguments).await
    }

    /// Helper to convert CLI arguments to MCP tool arguments
    pub fn create_arguments(
        &self,
        pairs: Vec<(&str, serde_json::Value)>,
    ) -> Map<String, serde_json::Value> {
        let mut args = Map::new();
        for (key, value) in pairs {
            args.insert(key.to_string(), value);
        }
        args
    }

    /// Check if a tool exists
    pub fn has_tool(&self, tool_name: &str) -> bool {
        self.server.tool_registry().get_tool(tool_name).is_some()
    }
}

/// Utilities for reading MCP responses in CLI commands
pub mod response_formatting {
    use colored::*;
    use rmcp::model::{CallToolResult, RawContent};

    /// Extract text content from CallToolResult
    pub fn extract_text_content(result: &CallToolResult) -> Option<String> {
        result
            .content
            .first()
            .and_then(|content| match &content.raw {
                RawContent::Text(text_content) => Some(text_content.text.clone()),
                _ => None,
            })
    }

    /// Extract and format error message from MCP response
    pub fn format_error_response(result: &CallToolResult, use_color: bool) -> String {
        let text =
            extract_text_content(result).unwrap_or_else(|| "An unknown error occurred".to_string());
        if use_color {
            text.red().to_string()
        } else {
            text
        }
    }
}
