//! MCP server implementation for serving FogBugz documentation tools

use crate::agent::DocsAgent;
use crate::client::FogBugzClient;
use crate::config::Config;
use crate::source::DocumentationSource;
use crate::Result;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler};
use std::sync::Arc;

use super::tool_handlers::ToolHandlers;
use super::tool_registry::{
    register_agent_tools, register_documentation_tools, register_utility_tools, ToolContext,
    ToolRegistry,
};

/// Name reported to MCP clients
pub const SERVER_NAME: &str = "FogBugz Documentation MCP";

const INSTRUCTIONS: &str = "This MCP server provides read-only access to FogBugz wikis and articles. \
Use `list_wikis` to discover documentation spaces, `list_articles` to list articles in a wiki, \
`search_articles` to find articles by keyword, and `view_article` to get the content of a specific \
article as Markdown. Note: `view_article` requires an `article_id` obtained from `list_articles` \
or `search_articles`.";

/// MCP server exposing the documentation tools
#[derive(Clone)]
pub struct McpServer {
    tool_registry: Arc<ToolRegistry>,
    /// Tool context containing shared state for tool execution
    pub tool_context: Arc<ToolContext>,
}

impl McpServer {
    /// Create a server talking to the FogBugz instance in `config`
    ///
    /// `ask_agent` is only registered when an LLM is configured.
    pub fn new(config: &Config) -> Result<Self> {
        let client = FogBugzClient::new(&config.fogbugz)?;
        let mut handlers = ToolHandlers::new(Arc::new(client), config.search_limit);

        if let Some(agent_config) = &config.agent {
            handlers = handlers.with_agent(DocsAgent::from_config(agent_config)?);
        } else {
            tracing::info!("No LLM configured, ask_agent is disabled");
        }

        Ok(Self::with_handlers(handlers))
    }

    /// Create a server over any documentation source, without the agent
    pub fn with_source(source: Arc<dyn DocumentationSource>, search_limit: usize) -> Self {
        Self::with_handlers(ToolHandlers::new(source, search_limit))
    }

    /// Create a server from prepared handlers
    pub fn with_handlers(handlers: ToolHandlers) -> Self {
        let mut tool_registry = ToolRegistry::new();
        register_utility_tools(&mut tool_registry);
        register_documentation_tools(&mut tool_registry);
        if handlers.has_agent() {
            register_agent_tools(&mut tool_registry);
        }

        tracing::debug!("Registered tools: {:?}", tool_registry.list_tool_names());

        Self {
            tool_registry: Arc::new(tool_registry),
            tool_context: Arc::new(ToolContext::new(Arc::new(handlers))),
        }
    }

    /// The registry backing `list_tools` and `call_tool`
    pub fn tool_registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// Run a tool by name
    pub async fn execute_tool(
        &self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self.tool_registry.get_tool(name) {
            Some(tool) => {
                tracing::debug!("Calling tool {}", name);
                tool.execute(arguments, &self.tool_context).await
            }
            None => Err(McpError::invalid_request(
                format!("Unknown tool: {name}"),
                None,
            )),
        }
    }

    fn capabilities() -> ServerCapabilities {
        ServerCapabilities {
            prompts: None,
            tools: Some(ToolsCapability {
                list_changed: Some(false),
            }),
            resources: None,
            logging: None,
            completions: None,
            experimental: None,
        }
    }
}

impl ServerHandler for McpServer {
    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<InitializeResult, McpError> {
        tracing::info!(
            "MCP client connecting: {} v{}",
            request.client_info.name,
            request.client_info.version
        );
        Ok(self.get_info())
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_registry.list_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.execute_tool(&request.name, request.arguments.unwrap_or_default())
            .await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: Self::capabilities(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: crate::VERSION.into(),
            },
            instructions: Some(INSTRUCTIONS.into()),
        }
    }
}
