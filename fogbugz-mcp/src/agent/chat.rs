//! Chat-completions client for OpenAI and Azure OpenAI

use super::types::{ApiErrorBody, ChatMessage, ChatRequest, ChatResponse, ToolDefinition};
use crate::config::{AgentConfig, LlmProvider};
use crate::error::{FogBugzError, Result};
use async_trait::async_trait;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Something that can answer one chat-completions turn
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the conversation so far and return the assistant's reply
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatMessage>;
}

/// HTTP chat-completions client
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    provider: LlmProvider,
    api_key: String,
    endpoint: String,
    model: String,
    api_version: String,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Build a client for the configured provider
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            provider: config.provider,
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_version: config.api_version.clone(),
        })
    }

    /// Model (or Azure deployment) name
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        match self.provider {
            LlmProvider::OpenAi => format!("{}/chat/completions", self.endpoint),
            LlmProvider::Azure => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.endpoint, self.model, self.api_version
            ),
        }
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatMessage> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            tools,
            temperature: 0.0,
        };

        let builder = self.http.post(self.url()).json(&request);
        let builder = match self.provider {
            LlmProvider::OpenAi => builder.bearer_auth(&self.api_key),
            LlmProvider::Azure => builder.header("api-key", &self.api_key),
        };

        tracing::debug!(
            "Chat completion: {} messages, {} tools, model {}",
            messages.len(),
            tools.len(),
            self.model
        );
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(FogBugzError::Agent(format!(
                "LLM API error ({}): {}",
                status.as_u16(),
                message
            )));
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| FogBugzError::Agent("LLM returned no choices".to_string()))
    }
}
