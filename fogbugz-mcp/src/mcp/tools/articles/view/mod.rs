//! Article viewing tool

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::ViewArticleRequest;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool for reading one article as Markdown
#[derive(Default)]
pub struct ViewArticleTool;

impl ViewArticleTool {
    /// Creates a new instance of the ViewArticleTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for ViewArticleTool {
    fn name(&self) -> &'static str {
        "view_article"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "article_id": {
                    "type": "integer",
                    "description": "The ID of the article to view"
                }
            },
            "required": ["article_id"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: ViewArticleRequest = BaseToolImpl::parse_arguments(arguments)?;
        context.tool_handlers.handle_view_article(request).await
    }
}
