//! Tool handlers for MCP operations
//!
//! `ToolHandlers` owns the article index and the optional agent and holds the
//! logic behind every tool; the tool structs only parse arguments and
//! delegate here.

use super::responses::{create_json_response, create_success_response};
use super::shared_utils::{McpErrorHandler, McpValidation};
use super::tool_registry::{register_documentation_tools, RegistryToolset, ToolContext, ToolRegistry};
use super::types::*;
use crate::agent::DocsAgent;
use crate::search::ArticleIndex;
use crate::source::DocumentationSource;
use crate::types::ArticleSummary;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use std::sync::Arc;

/// Reported when `ask_agent` is requested without an LLM configured
pub const NO_AGENT_MESSAGE: &str =
    "No LLM is configured; set OPENAI_API_KEY or AZURE_OPENAI_API_KEY";

/// Tool handlers for MCP server operations
#[derive(Clone)]
pub struct ToolHandlers {
    index: Arc<ArticleIndex>,
    search_limit: usize,
    agent: Option<Arc<DocsAgent>>,
}

impl ToolHandlers {
    /// Create handlers over a documentation source
    pub fn new(source: Arc<dyn DocumentationSource>, search_limit: usize) -> Self {
        Self {
            index: Arc::new(ArticleIndex::new(source)),
            search_limit: search_limit.max(1),
            agent: None,
        }
    }

    /// Attach the documentation agent, enabling `ask_agent`
    pub fn with_agent(mut self, agent: DocsAgent) -> Self {
        self.agent = Some(Arc::new(agent));
        self
    }

    /// Whether `ask_agent` can be served
    pub fn has_agent(&self) -> bool {
        self.agent.is_some()
    }

    /// The shared article index
    pub fn index(&self) -> &Arc<ArticleIndex> {
        &self.index
    }

    /// Handle `ping`
    pub async fn handle_ping(
        &self,
        _request: PingRequest,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(create_success_response("pong".to_string()))
    }

    /// Handle `list_wikis`
    ///
    /// Always asks FogBugz, and the fresh list replaces the cached index.
    pub async fn handle_list_wikis(
        &self,
        _request: ListWikisRequest,
    ) -> std::result::Result<CallToolResult, McpError> {
        let wikis =
            McpErrorHandler::handle_result(self.index.reload_wikis().await, "list wikis")?;
        create_json_response(&wikis)
    }

    /// Handle `list_articles`
    pub async fn handle_list_articles(
        &self,
        request: ListArticlesRequest,
    ) -> std::result::Result<CallToolResult, McpError> {
        McpValidation::validate_id(request.wiki_id, "wiki_id")?;

        let articles = McpErrorHandler::handle_result(
            self.index.reload_articles(request.wiki_id).await,
            "list articles",
        )?;

        let articles: Vec<ArticleSummary> = articles
            .into_iter()
            .map(|article| ArticleSummary {
                wiki_id: None,
                ..article
            })
            .collect();
        create_json_response(&articles)
    }

    /// Handle `search_articles`
    pub async fn handle_search_articles(
        &self,
        request: SearchArticlesRequest,
    ) -> std::result::Result<CallToolResult, McpError> {
        McpValidation::validate_not_empty(&request.query, "query")?;

        let limit = request.limit.unwrap_or(self.search_limit);
        if limit == 0 {
            return Err(McpError::invalid_params(
                "limit must be at least 1".to_string(),
                None,
            ));
        }

        if request.remote.unwrap_or(false) {
            let mut hits = McpErrorHandler::handle_result(
                self.index.source().search_articles(&request.query).await,
                "remote search",
            )?;
            hits.truncate(limit);
            return create_json_response(&hits);
        }

        let hits = McpErrorHandler::handle_result(
            self.index.search(&request.query, limit).await,
            "search articles",
        )?;
        create_json_response(&hits)
    }

    /// Handle `view_article`
    pub async fn handle_view_article(
        &self,
        request: ViewArticleRequest,
    ) -> std::result::Result<CallToolResult, McpError> {
        McpValidation::validate_id(request.article_id, "article_id")?;

        let article = McpErrorHandler::handle_result(
            self.index.source().view_article(request.article_id).await,
            "view article",
        )?;
        create_json_response(&article)
    }

    /// Handle `ask_agent`
    ///
    /// The agent gets its own registry holding only the documentation tools,
    /// so it cannot recurse into itself.
    pub async fn handle_ask_agent(
        &self,
        request: AskAgentRequest,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        McpValidation::validate_not_empty(&request.query, "query")?;

        let agent = self
            .agent
            .as_ref()
            .ok_or_else(|| McpError::invalid_request(NO_AGENT_MESSAGE.to_string(), None))?;

        let mut registry = ToolRegistry::new();
        register_documentation_tools(&mut registry);
        let toolset = RegistryToolset::new(&registry, context);

        tracing::info!("Agent received query: {}", request.query);
        let answer = McpErrorHandler::handle_result(
            agent.ask(&request.query, &toolset).await,
            "ask agent",
        )?;
        Ok(create_success_response(answer))
    }
}
