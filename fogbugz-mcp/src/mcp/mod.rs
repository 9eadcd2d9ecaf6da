//! Model Context Protocol (MCP) server support
//!
//! This module exposes the FogBugz documentation as MCP tools. Tools are
//! registered in a [`ToolRegistry`] and dispatched by [`McpServer`].

pub mod responses;
pub mod server;
pub mod shared_utils;
pub mod tool_handlers;
pub mod tool_registry;
pub mod tools;
pub mod types;


pub use server::{McpServer, SERVER_NAME};
pub use tool_handlers::ToolHandlers;
pub use tool_registry::{
    register_agent_tools, register_documentation_tools, register_utility_tools, McpTool,
    RegistryToolset, ToolContext, ToolRegistry,
};
pub use types::{
    AskAgentRequest, ListArticlesRequest, ListWikisRequest, PingRequest, SearchArticlesRequest,
    ViewArticleRequest,
};
