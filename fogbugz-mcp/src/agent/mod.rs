//! Documentation agent
//!
//! [`DocsAgent`] answers a free-form question by letting a chat model call
//! the documentation tools in a loop: the model either asks for tool calls,
//! whose results are fed back as `tool` messages, or replies with a final
//! answer. The number of model round trips is bounded.

pub mod chat;
pub mod types;

pub use chat::{ChatBackend, ChatClient};
pub use types::{ChatMessage, Role, ToolCall, ToolDefinition};

use crate::config::AgentConfig;
use crate::error::{FogBugzError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Answer returned when the model finishes without any text
pub const NO_RESPONSE: &str = "No response generated.";

const SYSTEM_PROMPT: &str = "You answer questions about the team's FogBugz wiki documentation. \
Use the tools to find and read the relevant articles before answering. \
Prefer search_articles to locate articles and view_article to read them. \
Cite article titles and ids in your answer. If the documentation does not cover the question, say so.";

/// Tools the agent may call
#[async_trait]
pub trait AgentTools: Send + Sync {
    /// Definitions advertised to the model
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// Whether a tool with this name exists
    fn has_tool(&self, name: &str) -> bool;

    /// Run a tool; `Err` carries the error text shown to the model
    async fn call(
        &self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<String, String>;
}

/// Tool-calling loop over a chat backend
pub struct DocsAgent {
    backend: Arc<dyn ChatBackend>,
    max_iterations: usize,
}

impl std::fmt::Debug for DocsAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocsAgent")
            .field("max_iterations", &self.max_iterations)
            .finish_non_exhaustive()
    }
}

impl DocsAgent {
    /// Create an agent over any chat backend
    pub fn new(backend: Arc<dyn ChatBackend>, max_iterations: usize) -> Self {
        Self {
            backend,
            max_iterations: max_iterations.max(1),
        }
    }

    /// Create an agent talking to the configured OpenAI or Azure endpoint
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let client = ChatClient::new(config)?;
        tracing::info!(
            "Documentation agent using {:?} model {}",
            config.provider,
            client.model()
        );
        Ok(Self::new(Arc::new(client), config.max_iterations))
    }

    /// Answer `query`, calling `tools` as the model requests
    pub async fn ask(&self, query: &str, tools: &dyn AgentTools) -> Result<String> {
        let definitions = tools.definitions();
        let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(query)];

        for iteration in 1..=self.max_iterations {
            let reply = self.backend.complete(&messages, &definitions).await?;

            if reply.tool_calls.is_empty() {
                tracing::debug!("Agent answered after {} model calls", iteration);
                return Ok(reply
                    .content
                    .filter(|content| !content.trim().is_empty())
                    .unwrap_or_else(|| NO_RESPONSE.to_string()));
            }

            let calls = reply.tool_calls.clone();
            messages.push(reply);

            for call in calls {
                let output = self.run_tool(&call, tools).await;
                messages.push(ChatMessage::tool(call.id, call.function.name, output));
            }
        }

        Err(FogBugzError::Agent(format!(
            "no final answer after {} model calls",
            self.max_iterations
        )))
    }

    async fn run_tool(&self, call: &ToolCall, tools: &dyn AgentTools) -> String {
        let name = call.function.name.as_str();
        if !tools.has_tool(name) {
            tracing::warn!("Model requested unknown tool {}", name);
            return format!("Tool {} not found", name);
        }

        let arguments = match parse_arguments(&call.function.arguments) {
            Ok(arguments) => arguments,
            Err(e) => return format!("Invalid arguments for {}: {}", name, e),
        };

        tracing::debug!("Agent calling {} with {:?}", name, arguments);
        match tools.call(name, arguments).await {
            Ok(output) => output,
            Err(error) => {
                tracing::warn!("Tool {} failed: {}", name, error);
                error
            }
        }
    }
}

fn parse_arguments(
    raw: &str,
) -> std::result::Result<serde_json::Map<String, serde_json::Value>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(serde_json::Map::new());
    }
    serde_json::from_str(raw)
}
