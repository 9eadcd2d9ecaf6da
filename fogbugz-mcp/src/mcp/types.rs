//! Request types for the documentation tools

use crate::types::{ArticleId, WikiId};
use serde::Deserialize;

/// Request for `ping`
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct PingRequest {}

/// Request for `list_wikis`
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListWikisRequest {}

/// Request for `list_articles`
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListArticlesRequest {
    /// Wiki to list
    pub wiki_id: WikiId,
}

/// Request for `search_articles`
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchArticlesRequest {
    /// Keywords to look for in article titles
    pub query: String,
    /// Maximum number of results
    #[serde(default)]
    pub limit: Option<usize>,
    /// Use FogBugz full-text search instead of the local title index
    #[serde(default)]
    pub remote: Option<bool>,
}

/// Request for `view_article`
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ViewArticleRequest {
    /// Article (wiki page) id
    pub article_id: ArticleId,
}

/// Request for `ask_agent`
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AskAgentRequest {
    /// Question about the documentation
    pub query: String,
}
