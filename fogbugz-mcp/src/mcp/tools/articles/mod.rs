//! Article tools
//!
//! Listing, searching and reading wiki articles. `view_article` needs an
//! `article_id`, which comes from `list_articles` or `search_articles`.

pub mod list;
pub mod search;
pub mod view;

use crate::mcp::tool_registry::ToolRegistry;

/// Register all article tools with the registry
pub fn register_article_tools(registry: &mut ToolRegistry) {
    registry.register(list::ListArticlesTool::new());
    registry.register(search::SearchArticlesTool::new());
    registry.register(view::ViewArticleTool::new());
}
