//! Tool registry for MCP operations
//!
//! Every tool implements [`McpTool`] and is registered by name in a
//! [`ToolRegistry`]. The MCP server, the CLI and the documentation agent all
//! dispatch through the same registry.

use super::responses::response_text;
use super::tool_handlers::ToolHandlers;
use crate::agent::{AgentTools, ToolDefinition};
use rmcp::model::{CallToolResult, Tool};
use rmcp::Error as McpError;
use std::collections::HashMap;
use std::sync::Arc;

/// Context shared by all tools during execution
#[derive(Clone)]
pub struct ToolContext {
    /// The tool handlers instance containing the business logic
    pub tool_handlers: Arc<ToolHandlers>,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(tool_handlers: Arc<ToolHandlers>) -> Self {
        Self { tool_handlers }
    }
}

/// Trait defining the interface for all MCP tools
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Get the tool's name
    fn name(&self) -> &'static str;

    /// Get the tool's description
    fn description(&self) -> &'static str;

    /// Get the tool's JSON schema for arguments
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments and context
    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError>;
}

/// Registry for managing MCP tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn McpTool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool in the registry
    pub fn register<T: McpTool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Box::new(tool));
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// List all registered tool names, sorted
    pub fn list_tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    fn sorted_tools(&self) -> Vec<&dyn McpTool> {
        let mut tools: Vec<&dyn McpTool> = self.tools.values().map(|tool| tool.as_ref()).collect();
        tools.sort_by_key(|tool| tool.name());
        tools
    }

    /// Get all registered tools as Tool objects for MCP list_tools response
    pub fn list_tools(&self) -> Vec<Tool> {
        self.sorted_tools()
            .into_iter()
            .map(|tool| {
                let schema_map = match tool.schema() {
                    serde_json::Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };

                Tool {
                    name: tool.name().into(),
                    description: Some(tool.description().into()),
                    input_schema: Arc::new(schema_map),
                    annotations: None,
                }
            })
            .collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Base implementation providing common utility methods for MCP tools
pub struct BaseToolImpl;

impl BaseToolImpl {
    /// Parse tool arguments from a JSON map into a typed struct
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<T, McpError> {
        serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| McpError::invalid_request(format!("Invalid arguments: {e}"), None))
    }
}

/// Register `ping`
pub fn register_utility_tools(registry: &mut ToolRegistry) {
    use crate::mcp::tools::ping;
    ping::register_ping_tools(registry);
}

/// Register the wiki and article tools
pub fn register_documentation_tools(registry: &mut ToolRegistry) {
    use crate::mcp::tools::{articles, wikis};
    wikis::register_wiki_tools(registry);
    articles::register_article_tools(registry);
}

/// Register `ask_agent`
pub fn register_agent_tools(registry: &mut ToolRegistry) {
    use crate::mcp::tools::agent;
    agent::register_agent_tools(registry);
}

/// Registry tools exposed to the documentation agent
pub struct RegistryToolset<'a> {
    registry: &'a ToolRegistry,
    context: &'a ToolContext,
}

impl<'a> RegistryToolset<'a> {
    /// Expose every tool in `registry`, executed with `context`
    pub fn new(registry: &'a ToolRegistry, context: &'a ToolContext) -> Self {
        Self { registry, context }
    }
}

#[async_trait::async_trait]
impl<'a> AgentTools for RegistryToolset<'a> {
    fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry
            .sorted_tools()
            .into_iter()
            .map(|tool| ToolDefinition::function(tool.name(), tool.description(), tool.schema()))
            .collect()
    }

    fn has_tool(&self, name: &str) -> bool {
        self.registry.get_tool(name).is_some()
    }

    async fn call(
        &self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<String, String> {
        let tool = self
            .registry
            .get_tool(name)
            .ok_or_else(|| format!("Tool {name} not found"))?;

        match tool.execute(arguments, self.context).await {
            Ok(result) if result.is_error == Some(true) => Err(response_text(&result)),
            Ok(result) => Ok(response_text(&result)),
            Err(error) => Err(error.message.to_string()),
        }
    }
}
