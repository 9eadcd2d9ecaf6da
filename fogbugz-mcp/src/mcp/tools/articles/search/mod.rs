//! Article search tool

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::SearchArticlesRequest;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool for searching articles by keyword
#[derive(Default)]
pub struct SearchArticlesTool;

impl SearchArticlesTool {
    /// Creates a new instance of the SearchArticlesTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for SearchArticlesTool {
    fn name(&self) -> &'static str {
        "search_articles"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum number of results"
                },
                "remote": {
                    "type": "boolean",
                    "description": "Use FogBugz full-text search instead of the cached title index"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: SearchArticlesRequest = BaseToolImpl::parse_arguments(arguments)?;
        context.tool_handlers.handle_search_articles(request).await
    }
}
