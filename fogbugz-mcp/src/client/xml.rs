//! XML envelopes returned by the FogBugz `api.asp` endpoint
//!
//! Every response is wrapped in `<response>`. A failed command carries an
//! `<error code="N">` child instead of its payload, so every parser checks for
//! that first. Numeric fields are read as text and parsed by hand because
//! FogBugz pads some of them with whitespace inside CDATA sections.

use crate::error::{FogBugzError, Result};
use crate::types::{ArticleId, ArticleSummary, Wiki, WikiId};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    error: Option<ErrorNode>,
    wikis: Option<WikisNode>,
    articles: Option<ArticlesNode>,
    wikipage: Option<WikiPageNode>,
    cases: Option<CasesNode>,
}

#[derive(Debug, Deserialize)]
struct ErrorNode {
    #[serde(rename = "@code", default)]
    code: Option<String>,
    #[serde(rename = "$text", default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct WikisNode {
    #[serde(rename = "wiki", default)]
    wikis: Vec<WikiNode>,
}

#[derive(Debug, Deserialize)]
struct WikiNode {
    #[serde(rename = "ixWiki")]
    ix_wiki: Option<String>,
    #[serde(rename = "sWiki")]
    s_wiki: Option<String>,
    #[serde(rename = "sTagLineHTML")]
    s_tag_line_html: Option<String>,
    #[serde(rename = "ixWikiPageRoot")]
    ix_wiki_page_root: Option<String>,
    #[serde(rename = "fDeleted")]
    f_deleted: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticlesNode {
    #[serde(rename = "article", default)]
    articles: Vec<HeadlineNode>,
}

#[derive(Debug, Deserialize)]
struct CasesNode {
    #[serde(rename = "case", default)]
    cases: Vec<HeadlineNode>,
}

/// Shared shape of `<article>` (listArticles) and `<case>` (search with
/// `cols=ixWikiPage,sHeadline`)
#[derive(Debug, Deserialize)]
struct HeadlineNode {
    #[serde(rename = "ixWikiPage")]
    ix_wiki_page: Option<String>,
    #[serde(rename = "sHeadline")]
    s_headline: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WikiPageNode {
    #[serde(rename = "sHeadline")]
    s_headline: Option<String>,
    #[serde(rename = "sBody")]
    s_body: Option<String>,
    #[serde(rename = "nRevision")]
    n_revision: Option<String>,
    tags: Option<TagsNode>,
}

#[derive(Debug, Deserialize)]
struct TagsNode {
    #[serde(rename = "tag", default)]
    tags: Vec<String>,
}

/// A wiki page before its body has been converted to Markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArticle {
    /// Trimmed `sHeadline`
    pub title: String,
    /// Trimmed `sBody` HTML
    pub body_html: String,
    /// `nRevision`, 0 when absent
    pub revision: i64,
    /// Non-empty trimmed tags
    pub tags: Vec<String>,
}

fn parse_envelope(xml: &str) -> Result<Envelope> {
    let envelope: Envelope = quick_xml::de::from_str(xml)?;
    if let Some(error) = envelope.error {
        let code = error
            .code
            .as_deref()
            .and_then(|code| code.trim().parse().ok())
            .unwrap_or(0);
        return Err(FogBugzError::Api {
            code,
            message: error.message.trim().to_string(),
        });
    }
    Ok(envelope)
}

fn parse_id(value: Option<&str>) -> Option<i64> {
    value.and_then(|value| value.trim().parse().ok())
}

fn trimmed(value: Option<String>) -> String {
    value.map(|value| value.trim().to_string()).unwrap_or_default()
}

/// Parse a `listWikis` response, dropping deleted wikis
pub fn parse_wikis(xml: &str) -> Result<Vec<Wiki>> {
    let Some(wikis) = parse_envelope(xml)?.wikis else {
        return Ok(Vec::new());
    };

    let mut results = Vec::with_capacity(wikis.wikis.len());
    for node in wikis.wikis {
        let deleted = node
            .f_deleted
            .as_deref()
            .map(|flag| flag.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if deleted {
            continue;
        }

        let (Some(wiki_id), Some(root_page_id)) = (
            parse_id(node.ix_wiki.as_deref()),
            parse_id(node.ix_wiki_page_root.as_deref()),
        ) else {
            tracing::warn!(
                "Skipping wiki with unparsable ids: ixWiki={:?} ixWikiPageRoot={:?}",
                node.ix_wiki,
                node.ix_wiki_page_root
            );
            continue;
        };

        results.push(Wiki {
            wiki_id,
            name: trimmed(node.s_wiki),
            tagline: trimmed(node.s_tag_line_html),
            root_page_id,
        });
    }

    Ok(results)
}

fn headlines(nodes: Vec<HeadlineNode>, wiki_id: Option<WikiId>) -> Vec<ArticleSummary> {
    nodes
        .into_iter()
        .filter_map(|node| {
            let article_id = parse_id(node.ix_wiki_page.as_deref())?;
            let title = node.s_headline?;
            Some(ArticleSummary {
                article_id,
                title: title.trim().to_string(),
                wiki_id,
            })
        })
        .collect()
}

/// Parse a `listArticles` response for the given wiki
pub fn parse_articles(xml: &str, wiki_id: WikiId) -> Result<Vec<ArticleSummary>> {
    Ok(parse_envelope(xml)?
        .articles
        .map(|articles| headlines(articles.articles, Some(wiki_id)))
        .unwrap_or_default())
}

/// Parse a `search` response requested with `cols=ixWikiPage,sHeadline`
pub fn parse_search(xml: &str) -> Result<Vec<ArticleSummary>> {
    Ok(parse_envelope(xml)?
        .cases
        .map(|cases| headlines(cases.cases, None))
        .unwrap_or_default())
}

/// Parse a `viewArticle` response
pub fn parse_article(xml: &str, article_id: ArticleId) -> Result<RawArticle> {
    let page = parse_envelope(xml)?
        .wikipage
        .ok_or(FogBugzError::ArticleNotFound(article_id))?;

    let revision = match page.n_revision.as_deref().map(str::trim) {
        None | Some("") => 0,
        Some(value) => value
            .parse()
            .map_err(|_| FogBugzError::Xml(format!("invalid nRevision {value:?}")))?,
    };

    let tags = page
        .tags
        .map(|tags| {
            tags.tags
                .into_iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(RawArticle {
        title: trimmed(page.s_headline),
        body_html: trimmed(page.s_body),
        revision,
        tags,
    })
}
