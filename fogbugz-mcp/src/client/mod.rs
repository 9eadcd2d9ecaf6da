//! HTTP client for the FogBugz XML API
//!
//! All commands go through `GET {base_url}/api.asp?cmd=...&token=...`; the
//! response body is an XML envelope parsed by [`xml`].

pub mod xml;

use crate::config::FogBugzConfig;
use crate::error::{FogBugzError, Result};
use crate::markdown::html_to_markdown;
use crate::source::DocumentationSource;
use crate::types::{Article, ArticleId, ArticleSummary, Wiki, WikiId};
use async_trait::async_trait;
use std::time::Duration;

/// Client for the subset of the FogBugz API that serves wiki documentation
#[derive(Debug, Clone)]
pub struct FogBugzClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl FogBugzClient {
    /// Create a client from connection settings
    pub fn new(config: &FogBugzConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("fogbugz-mcp/{}", crate::VERSION))
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/api.asp", self.base_url)
    }

    /// Issue one API command and return the raw XML body
    async fn request(&self, cmd: &str, params: &[(&str, String)]) -> Result<String> {
        let mut query: Vec<(&str, String)> = Vec::with_capacity(params.len() + 2);
        query.extend(params.iter().cloned());
        query.push(("cmd", cmd.to_string()));
        query.push(("token", self.token.clone()));

        tracing::debug!("FogBugz request cmd={} params={:?}", cmd, params);
        let started = std::time::Instant::now();

        let response = self
            .http
            .get(self.endpoint())
            .query(&query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("FogBugz cmd={} failed with HTTP {}", cmd, status);
            return Err(FogBugzError::Status {
                status: status.as_u16(),
                url: format!("{}?cmd={}", self.endpoint(), cmd),
            });
        }

        let body = response.text().await.map_err(transport_error)?;
        tracing::debug!(
            "FogBugz cmd={} returned {} bytes in {:?}",
            cmd,
            body.len(),
            started.elapsed()
        );
        Ok(body)
    }

    /// List active wikis
    pub async fn list_wikis(&self) -> Result<Vec<Wiki>> {
        let body = self.request("listWikis", &[]).await?;
        xml::parse_wikis(&body)
    }

    /// List the articles of one wiki
    pub async fn list_articles(&self, wiki_id: WikiId) -> Result<Vec<ArticleSummary>> {
        let body = self
            .request("listArticles", &[("ixWiki", wiki_id.to_string())])
            .await?;
        xml::parse_articles(&body, wiki_id)
    }

    /// Fetch an article and convert its body to Markdown
    pub async fn view_article(&self, article_id: ArticleId) -> Result<Article> {
        let body = self
            .request("viewArticle", &[("ixWikiPage", article_id.to_string())])
            .await?;
        let raw = xml::parse_article(&body, article_id)?;

        Ok(Article {
            article_id,
            title: raw.title,
            content: html_to_markdown(&raw.body_html),
            revision: raw.revision,
            tags: raw.tags,
        })
    }

    /// Run FogBugz's own full-text search restricted to wiki articles
    pub async fn search_articles(&self, query: &str) -> Result<Vec<ArticleSummary>> {
        let body = self
            .request(
                "search",
                &[
                    ("q", format!("axis:articles {}", query.trim())),
                    ("cols", "ixWikiPage,sHeadline".to_string()),
                ],
            )
            .await?;
        xml::parse_search(&body)
    }
}

/// Request URLs carry the API token in the query string, so it never reaches
/// an error message
fn transport_error(error: reqwest::Error) -> FogBugzError {
    FogBugzError::Http(error.without_url())
}

#[async_trait]
impl DocumentationSource for FogBugzClient {
    async fn list_wikis(&self) -> Result<Vec<Wiki>> {
        FogBugzClient::list_wikis(self).await
    }

    async fn list_articles(&self, wiki_id: WikiId) -> Result<Vec<ArticleSummary>> {
        FogBugzClient::list_articles(self, wiki_id).await
    }

    async fn view_article(&self, article_id: ArticleId) -> Result<Article> {
        FogBugzClient::view_article(self, article_id).await
    }

    async fn search_articles(&self, query: &str) -> Result<Vec<ArticleSummary>> {
        FogBugzClient::search_articles(self, query).await
    }
}
