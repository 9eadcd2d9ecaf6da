//! Question answering tool backed by the documentation agent

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::AskAgentRequest;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool that hands a question to the documentation agent
#[derive(Default)]
pub struct AskAgentTool;

impl AskAgentTool {
    /// Creates a new instance of the AskAgentTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for AskAgentTool {
    fn name(&self) -> &'static str {
        "ask_agent"
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
                    "description": "Question about the FogBugz documentation"
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
        let request: AskAgentRequest = BaseToolImpl::parse_arguments(arguments)?;
        context
            .tool_handlers
            .handle_ask_agent(request, context)
            .await
    }
}
