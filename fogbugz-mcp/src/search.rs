//! Article index with keyword search
//!
//! The index lazily pulls wiki and article lists from a
//! [`DocumentationSource`] and keeps them in memory for the life of the
//! process. Searching only looks at article titles: distinct query keywords
//! found in a title score ten points each, and the full query appearing in
//! the title adds five more. When no title matches any keyword, a fuzzy
//! match over titles is used instead.

use crate::error::Result;
use crate::source::DocumentationSource;
use crate::types::{ArticleId, ArticleSummary, SearchHit, Wiki, WikiId};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Points for each distinct keyword found in a title
const KEYWORD_SCORE: i64 = 10;
/// Bonus when the whole query appears in a title
const PHRASE_BONUS: i64 = 5;

/// In-memory cache of wikis and their article lists
pub struct ArticleIndex {
    source: Arc<dyn DocumentationSource>,
    wikis: RwLock<Option<Vec<Wiki>>>,
    articles: DashMap<WikiId, Vec<ArticleSummary>>,
    loaded_at: RwLock<Option<DateTime<Utc>>>,
}

impl std::fmt::Debug for ArticleIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleIndex")
            .field("cached_wikis", &self.articles.len())
            .finish_non_exhaustive()
    }
}

impl ArticleIndex {
    /// Create an empty index over `source`
    pub fn new(source: Arc<dyn DocumentationSource>) -> Self {
        Self {
            source,
            wikis: RwLock::new(None),
            articles: DashMap::new(),
            loaded_at: RwLock::new(None),
        }
    }

    /// The source this index reads from
    pub fn source(&self) -> &Arc<dyn DocumentationSource> {
        &self.source
    }

    /// Cached wiki list, fetched on first use
    pub async fn wikis(&self) -> Result<Vec<Wiki>> {
        if let Some(wikis) = self.wikis.read().await.as_ref() {
            return Ok(wikis.clone());
        }

        let fetched = self.source.list_wikis().await?;
        tracing::debug!("Cached {} wikis", fetched.len());

        let mut guard = self.wikis.write().await;
        Ok(guard.get_or_insert(fetched).clone())
    }

    /// Cached article list for one wiki, fetched on first use
    pub async fn articles(&self, wiki_id: WikiId) -> Result<Vec<ArticleSummary>> {
        if let Some(cached) = self.articles.get(&wiki_id) {
            return Ok(cached.value().clone());
        }

        let fetched = self.source.list_articles(wiki_id).await?;
        tracing::debug!("Cached {} articles for wiki {}", fetched.len(), wiki_id);
        self.articles.insert(wiki_id, fetched.clone());
        Ok(fetched)
    }

    /// Fetch the wiki list from the source again
    ///
    /// Every cached article list is dropped along with the old wiki list, so
    /// the next search reindexes against the current wikis.
    pub async fn reload_wikis(&self) -> Result<Vec<Wiki>> {
        self.refresh().await;
        self.wikis().await
    }

    /// Fetch one wiki's article list from the source again and replace the
    /// cached copy
    pub async fn reload_articles(&self, wiki_id: WikiId) -> Result<Vec<ArticleSummary>> {
        let fetched = self.source.list_articles(wiki_id).await?;
        tracing::debug!("Reloaded {} articles for wiki {}", fetched.len(), wiki_id);
        self.articles.insert(wiki_id, fetched.clone());
        Ok(fetched)
    }

    /// Load the article list of every wiki
    ///
    /// A wiki whose article list cannot be fetched is logged and left out;
    /// failing to list the wikis themselves is an error.
    pub async fn ensure_loaded(&self) -> Result<()> {
        let wikis = self.wikis().await?;

        for wiki in &wikis {
            if self.articles.contains_key(&wiki.wiki_id) {
                continue;
            }
            if let Err(e) = self.articles(wiki.wiki_id).await {
                tracing::warn!("Skipping wiki {} ({}): {}", wiki.wiki_id, wiki.name, e);
            }
        }

        let mut loaded_at = self.loaded_at.write().await;
        if loaded_at.is_none() {
            *loaded_at = Some(Utc::now());
            tracing::info!(
                "Article index loaded: {} wikis, {} articles",
                wikis.len(),
                self.article_count()
            );
        }
        Ok(())
    }

    /// Drop everything cached so the next call reloads from the source
    pub async fn refresh(&self) {
        *self.wikis.write().await = None;
        self.articles.clear();
        *self.loaded_at.write().await = None;
        tracing::info!("Article index cleared");
    }

    /// Number of cached article entries across all wikis
    pub fn article_count(&self) -> usize {
        self.articles.iter().map(|entry| entry.value().len()).sum()
    }

    /// Search cached article titles
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let keywords = keywords(query);
        if keywords.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        self.ensure_loaded().await?;
        let wikis = self.wikis().await?;
        let names: HashMap<WikiId, &str> = wikis
            .iter()
            .map(|wiki| (wiki.wiki_id, wiki.name.as_str()))
            .collect();

        let candidates: Vec<ArticleSummary> = wikis
            .iter()
            .filter_map(|wiki| self.articles.get(&wiki.wiki_id))
            .flat_map(|entry| entry.value().clone())
            .collect();

        let phrase = query.trim().to_lowercase();
        let mut scored: Vec<(i64, &ArticleSummary)> = candidates
            .iter()
            .filter_map(|article| {
                let score = keyword_score(&article.title, &keywords, &phrase);
                (score > 0).then_some((score, article))
            })
            .collect();

        if scored.is_empty() {
            tracing::debug!("No keyword hits for '{}', trying fuzzy match", query);
            let matcher = SkimMatcherV2::default();
            scored = candidates
                .iter()
                .filter_map(|article| {
                    matcher
                        .fuzzy_match(&article.title, query.trim())
                        .filter(|score| *score > 0)
                        .map(|score| (score, article))
                })
                .collect();
        }

        let mut best: HashMap<ArticleId, SearchHit> = HashMap::new();
        for (score, article) in scored {
            let hit = SearchHit {
                article_id: article.article_id,
                title: article.title.clone(),
                wiki_id: article.wiki_id,
                wiki_name: article
                    .wiki_id
                    .and_then(|id| names.get(&id))
                    .map(|name| name.to_string()),
                score,
            };
            match best.get(&hit.article_id) {
                Some(existing) if existing.score >= hit.score => {}
                _ => {
                    best.insert(hit.article_id, hit);
                }
            }
        }

        let mut hits: Vec<SearchHit> = best.into_values().collect();
        hits.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.article_id.cmp(&b.article_id))
        });
        hits.truncate(limit);

        tracing::debug!("Search '{}' returned {} hits", query, hits.len());
        Ok(hits)
    }
}

/// Split a query into distinct lowercase keywords
fn keywords(query: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for word in query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if !words.iter().any(|existing| existing == word) {
            words.push(word.to_string());
        }
    }
    words
}

fn keyword_score(title: &str, keywords: &[String], phrase: &str) -> i64 {
    let title = title.to_lowercase();
    let matched = keywords
        .iter()
        .filter(|keyword| title.contains(keyword.as_str()))
        .count() as i64;

    let mut score = matched * KEYWORD_SCORE;
    if !phrase.is_empty() && title.contains(phrase) {
        score += PHRASE_BONUS;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_source::MockDocumentationSource;
    use std::sync::atomic::Ordering;

    async fn sample_source() -> MockDocumentationSource {
        let source = MockDocumentationSource::new();
        source.add_wiki(1, "Engineering").await;
        source.add_wiki(2, "Support").await;
        source
            .add_article(1, 10, "Deploying the API server", "")
            .await;
        source.add_article(1, 11, "API authentication", "").await;
        source.add_article(2, 20, "Server maintenance", "").await;
        source.add_article(2, 21, "Billing FAQ", "").await;
        source
    }

    #[test]
    fn test_keywords_are_distinct_and_lowercase() {
        assert_eq!(
            keywords("API, api-Server!"),
            vec!["api".to_string(), "server".to_string()]
        );
        assert!(keywords("  ...  ").is_empty());
    }

    #[test]
    fn test_keyword_score() {
        let kws = keywords("api server");
        assert_eq!(keyword_score("Deploying the API server", &kws, "api server"), 25);
        assert_eq!(keyword_score("Server maintenance", &kws, "api server"), 10);
        assert_eq!(keyword_score("Billing FAQ", &kws, "api server"), 0);
    }

    #[tokio::test]
    async fn test_search_ranks_by_score_then_title() {
        let source = sample_source().await;
        let index = ArticleIndex::new(Arc::new(source));

        let hits = index.search("api server", 10).await.unwrap();
        let ids: Vec<ArticleId> = hits.iter().map(|h| h.article_id).collect();
        assert_eq!(ids, vec![10, 11, 20]);
        assert_eq!(hits[0].score, 25);
        assert_eq!(hits[0].wiki_name.as_deref(), Some("Engineering"));
        assert_eq!(hits[2].wiki_id, Some(2));
    }

    #[tokio::test]
    async fn test_search_limit() {
        let index = ArticleIndex::new(Arc::new(sample_source().await));
        let hits = index.search("api server", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].article_id, 10);
    }

    #[tokio::test]
    async fn test_empty_query_returns_nothing() {
        let source = sample_source().await;
        let index = ArticleIndex::new(Arc::new(source.clone()));
        assert!(index.search("   ", 10).await.unwrap().is_empty());
        assert_eq!(source.calls().list_wikis.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fuzzy_fallback() {
        let index = ArticleIndex::new(Arc::new(sample_source().await));
        let hits = index.search("bilfaq", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].article_id, 21);
    }

    #[tokio::test]
    async fn test_lists_are_cached() {
        let source = sample_source().await;
        let index = ArticleIndex::new(Arc::new(source.clone()));

        index.search("api", 10).await.unwrap();
        index.search("server", 10).await.unwrap();
        index.articles(1).await.unwrap();

        assert_eq!(source.calls().list_wikis.load(Ordering::SeqCst), 1);
        assert_eq!(source.calls().list_articles.load(Ordering::SeqCst), 2);
        assert_eq!(index.article_count(), 4);
        assert!(index.loaded_at.read().await.is_some());
    }

    #[tokio::test]
    async fn test_refresh_reloads() {
        let source = sample_source().await;
        let index = ArticleIndex::new(Arc::new(source.clone()));

        index.ensure_loaded().await.unwrap();
        source.add_article(2, 22, "API changelog", "").await;
        index.refresh().await;
        assert!(index.loaded_at.read().await.is_none());

        let hits = index.search("changelog", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(source.calls().list_wikis.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_wiki_list_failure_propagates() {
        let source = sample_source().await;
        source.fail_with("unavailable").await;
        let index = ArticleIndex::new(Arc::new(source));
        assert!(index.search("api", 10).await.is_err());
    }

    #[tokio::test]
    async fn test_failing_wiki_is_skipped() {
        let source = sample_source().await;
        source.fail_articles_for(1).await;
        let index = ArticleIndex::new(Arc::new(source));

        let hits = index.search("api server", 10).await.unwrap();
        let ids: Vec<ArticleId> = hits.iter().map(|h| h.article_id).collect();
        assert_eq!(ids, vec![20]);
        assert_eq!(hits[0].wiki_name.as_deref(), Some("Support"));
        assert!(index.loaded_at.read().await.is_some());
    }

    #[tokio::test]
    async fn test_article_in_two_wikis_is_listed_once() {
        let source = sample_source().await;
        source.add_article(2, 10, "Deploying the API server", "").await;
        let index = ArticleIndex::new(Arc::new(source));

        let hits = index.search("deploying", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].article_id, 10);
        assert_eq!(hits[0].wiki_id, Some(1));
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_content() {
        let source = sample_source().await;
        let index = ArticleIndex::new(Arc::new(source.clone()));
        index.ensure_loaded().await.unwrap();

        source.add_wiki(3, "Sales").await;
        source.add_article(1, 12, "Rollback guide", "").await;

        assert_eq!(index.reload_wikis().await.unwrap().len(), 3);
        assert!(index.loaded_at.read().await.is_none());
        assert_eq!(index.reload_articles(1).await.unwrap().len(), 3);
        assert_eq!(index.search("rollback", 10).await.unwrap()[0].article_id, 12);
    }
}
