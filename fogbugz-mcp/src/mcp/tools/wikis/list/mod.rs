//! Wiki listing tool

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::ListWikisRequest;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool for listing active wikis
#[derive(Default)]
pub struct ListWikisTool;

impl ListWikisTool {
    /// Creates a new instance of the ListWikisTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for ListWikisTool {
    fn name(&self) -> &'static str {
        "list_wikis"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: ListWikisRequest = BaseToolImpl::parse_arguments(arguments)?;
        context.tool_handlers.handle_list_wikis(request).await
    }
}
