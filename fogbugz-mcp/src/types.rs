//! Documentation data model
//!
//! These are the shapes handed to MCP clients: field names match the JSON
//! the tools emit.

use serde::{Deserialize, Serialize};

/// Identifier of a FogBugz wiki (`ixWiki`)
pub type WikiId = i64;

/// Identifier of a FogBugz wiki page (`ixWikiPage`)
pub type ArticleId = i64;

/// An active (non-deleted) wiki space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wiki {
    /// `ixWiki`
    pub wiki_id: WikiId,
    /// `sWiki`
    pub name: String,
    /// `sTagLineHTML`
    pub tagline: String,
    /// `ixWikiPageRoot`
    pub root_page_id: ArticleId,
}

/// An article as listed inside a wiki
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// `ixWikiPage`, the id `view_article` expects
    pub article_id: ArticleId,
    /// `sHeadline`
    pub title: String,
    /// Wiki the article was listed in; unknown for server-side search hits
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub wiki_id: Option<WikiId>,
}

/// A fully rendered article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// `ixWikiPage`
    pub article_id: ArticleId,
    /// `sHeadline`
    pub title: String,
    /// Markdown converted from `sBody`
    pub content: String,
    /// `nRevision`
    pub revision: i64,
    /// `tags/tag`
    pub tags: Vec<String>,
}

/// A ranked keyword search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// `ixWikiPage`
    pub article_id: ArticleId,
    /// `sHeadline`
    pub title: String,
    /// Wiki containing the article, when known
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub wiki_id: Option<WikiId>,
    /// Name of that wiki, when known
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub wiki_name: Option<String>,
    /// Relevance score; higher is better
    pub score: i64,
}
