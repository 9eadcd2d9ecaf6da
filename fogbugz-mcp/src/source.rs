//! Abstraction over where documentation comes from
//!
//! The MCP tools, the article index and the agent only depend on this trait,
//! so they can run against the live FogBugz client or the in-memory
//! [`crate::mock_source::MockDocumentationSource`].

use crate::error::Result;
use crate::types::{Article, ArticleId, ArticleSummary, Wiki, WikiId};
use async_trait::async_trait;

/// Read-only access to wikis and their articles
#[async_trait]
pub trait DocumentationSource: Send + Sync {
    /// List active wikis
    async fn list_wikis(&self) -> Result<Vec<Wiki>>;

    /// List the articles in a wiki
    async fn list_articles(&self, wiki_id: WikiId) -> Result<Vec<ArticleSummary>>;

    /// Fetch an article with its body rendered as Markdown
    async fn view_article(&self, article_id: ArticleId) -> Result<Article>;

    /// Server-side search over article headlines and bodies
    async fn search_articles(&self, query: &str) -> Result<Vec<ArticleSummary>>;
}
