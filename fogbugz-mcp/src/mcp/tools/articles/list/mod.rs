//! Article listing tool

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::ListArticlesRequest;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool for listing the articles of one wiki
#[derive(Default)]
pub struct ListArticlesTool;

impl ListArticlesTool {
    /// Creates a new instance of the ListArticlesTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for ListArticlesTool {
    fn name(&self) -> &'static str {
        "list_articles"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "wiki_id": {
                    "type": "integer",
                    "description": "The ID of the wiki to list articles from"
                }
            },
            "required": ["wiki_id"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: ListArticlesRequest = BaseToolImpl::parse_arguments(arguments)?;
        context.tool_handlers.handle_list_articles(request).await
    }
}
