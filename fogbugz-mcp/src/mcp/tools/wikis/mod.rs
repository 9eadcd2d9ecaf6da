//! Wiki tools

pub mod list;

use crate::mcp::tool_registry::ToolRegistry;

/// Register all wiki tools with the registry
pub fn register_wiki_tools(registry: &mut ToolRegistry) {
    registry.register(list::ListWikisTool::new());
}
