//! In-memory documentation source for tests
//!
//! `MockDocumentationSource` serves wikis and articles from memory and counts
//! how often each operation is called, so callers can assert on caching
//! behavior without a FogBugz server.
//!
//! ```ignore
//! use fogbugz_mcp::mock_source::MockDocumentationSource;
//!
//! let source = MockDocumentationSource::new();
//! let wiki = source.add_wiki(1, "Engineering").await;
//! source.add_article(wiki, 10, "Build setup", "Run `make`.").await;
//! ```

use crate::error::{FogBugzError, Result};
use crate::source::DocumentationSource;
use crate::types::{Article, ArticleId, ArticleSummary, Wiki, WikiId};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MockState {
    wikis: BTreeMap<WikiId, Wiki>,
    articles: BTreeMap<(WikiId, ArticleId), Article>,
    fail_with: Option<String>,
    failing_wikis: BTreeSet<WikiId>,
}

/// Call counters for each source operation
#[derive(Debug, Default)]
pub struct CallCounts {
    /// `list_wikis` calls
    pub list_wikis: AtomicUsize,
    /// `list_articles` calls
    pub list_articles: AtomicUsize,
    /// `view_article` calls
    pub view_article: AtomicUsize,
    /// `search_articles` calls
    pub search_articles: AtomicUsize,
}

/// Documentation source backed by in-memory maps
#[derive(Debug, Clone, Default)]
pub struct MockDocumentationSource {
    state: Arc<RwLock<MockState>>,
    calls: Arc<CallCounts>,
}

impl MockDocumentationSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a wiki and return its id
    pub async fn add_wiki(&self, wiki_id: WikiId, name: &str) -> WikiId {
        let mut state = self.state.write().await;
        state.wikis.insert(
            wiki_id,
            Wiki {
                wiki_id,
                name: name.to_string(),
                tagline: String::new(),
                root_page_id: 0,
            },
        );
        wiki_id
    }

    /// Add an article to a wiki; the same article id may be added to several
    pub async fn add_article(
        &self,
        wiki_id: WikiId,
        article_id: ArticleId,
        title: &str,
        content: &str,
    ) {
        let mut state = self.state.write().await;
        state.articles.insert(
            (wiki_id, article_id),
            Article {
                article_id,
                title: title.to_string(),
                content: content.to_string(),
                revision: 1,
                tags: Vec::new(),
            },
        );
    }

    /// Make every subsequent call fail with an API error carrying `message`
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.state.write().await.fail_with = Some(message.into());
    }

    /// Make `list_articles` fail for one wiki only
    pub async fn fail_articles_for(&self, wiki_id: WikiId) {
        self.state.write().await.failing_wikis.insert(wiki_id);
    }

    /// Operation call counters
    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    async fn check_failure(&self) -> Result<()> {
        match &self.state.read().await.fail_with {
            Some(message) => Err(FogBugzError::Api {
                code: 0,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentationSource for MockDocumentationSource {
    async fn list_wikis(&self) -> Result<Vec<Wiki>> {
        self.calls.list_wikis.fetch_add(1, Ordering::SeqCst);
        self.check_failure().await?;
        Ok(self.state.read().await.wikis.values().cloned().collect())
    }

    async fn list_articles(&self, wiki_id: WikiId) -> Result<Vec<ArticleSummary>> {
        self.calls.list_articles.fetch_add(1, Ordering::SeqCst);
        self.check_failure().await?;
        let state = self.state.read().await;
        if state.failing_wikis.contains(&wiki_id) {
            return Err(FogBugzError::Api {
                code: 0,
                message: format!("wiki {wiki_id} is unavailable"),
            });
        }
        Ok(state
            .articles
            .iter()
            .filter(|((owner, _), _)| *owner == wiki_id)
            .map(|((owner, _), article)| ArticleSummary {
                article_id: article.article_id,
                title: article.title.clone(),
                wiki_id: Some(*owner),
            })
            .collect())
    }

    async fn view_article(&self, article_id: ArticleId) -> Result<Article> {
        self.calls.view_article.fetch_add(1, Ordering::SeqCst);
        self.check_failure().await?;
        self.state
            .read()
            .await
            .articles
            .values()
            .find(|article| article.article_id == article_id)
            .cloned()
            .ok_or(FogBugzError::ArticleNotFound(article_id))
    }

    async fn search_articles(&self, query: &str) -> Result<Vec<ArticleSummary>> {
        self.calls.search_articles.fetch_add(1, Ordering::SeqCst);
        self.check_failure().await?;
        let needle = query.trim().to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .articles
            .values()
            .filter(|article| {
                article.title.to_lowercase().contains(&needle)
                    || article.content.to_lowercase().contains(&needle)
            })
            .map(|article| ArticleSummary {
                article_id: article.article_id,
                title: article.title.clone(),
                wiki_id: None,
            })
            .collect())
    }
}
