//! Documentation agent tool

pub mod ask;

use crate::mcp::tool_registry::ToolRegistry;

/// Register `ask_agent`
pub fn register_agent_tools(registry: &mut ToolRegistry) {
    registry.register(ask::AskAgentTool::new());
}
