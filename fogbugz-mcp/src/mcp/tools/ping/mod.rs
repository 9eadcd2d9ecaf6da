//! Liveness check tool

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext, ToolRegistry};
use crate::mcp::types::PingRequest;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Register `ping`
pub fn register_ping_tools(registry: &mut ToolRegistry) {
    registry.register(PingTool::new());
}

/// Tool that answers `pong`
#[derive(Default)]
pub struct PingTool;

impl PingTool {
    /// Creates a new instance of the PingTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for PingTool {
    fn name(&self) -> &'static str {
        "ping"
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
        let request: PingRequest = BaseToolImpl::parse_arguments(arguments)?;
        context.tool_handlers.handle_ping(request).await
    }
}
