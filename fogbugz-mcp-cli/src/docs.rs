//! Documentation commands: `wikis`, `articles`, `search`, `view` and `ask`
//!
//! Each command calls the matching MCP tool through [`CliToolContext`] and
//! renders the JSON it returns.

use colored::*;
use fogbugz_mcp::mcp::tool_handlers::NO_AGENT_MESSAGE;
use fogbugz_mcp::{Article, ArticleSummary, SearchHit, Wiki};
use rmcp::model::CallToolResult;
use serde::de::DeserializeOwned;
use serde_json::json;
use tabled::{
    settings::{object::Rows, Color, Modify, Style},
    Table, Tabled,
};

use crate::cli::{Cli, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::exit_codes::{EXIT_ERROR, EXIT_WARNING};
use crate::mcp_integration::{response_formatting, CliToolContext};

/// A documentation command parsed from the command line
#[derive(Debug, Clone, PartialEq)]
pub enum DocsCommand {
    Wikis,
    Articles { wiki_id: i64 },
    Search {
        query: String,
        limit: Option<usize>,
        remote: bool,
    },
    View { article_id: i64 },
    Ask { query: String },
}

impl DocsCommand {
    /// Tool name and arguments the command maps to
    fn tool_call(&self) -> (&'static str, Vec<(&'static str, serde_json::Value)>) {
        match self {
            DocsCommand::Wikis => ("list_wikis", vec![]),
            DocsCommand::Articles { wiki_id } => ("list_articles", vec![("wiki_id", json!(wiki_id))]),
            DocsCommand::Search {
                query,
                limit,
                remote,
            } => {
                let mut args = vec![("query", json!(query))];
                if let Some(limit) = limit {
                    args.push(("limit", json!(limit)));
                }
                if *remote {
                    args.push(("remote", json!(true)));
                }
                ("search_articles", args)
            }
            DocsCommand::View { article_id } => {
                ("view_article", vec![("article_id", json!(article_id))])
            }
            DocsCommand::Ask { query } => ("ask_agent", vec![("query", json!(query))]),
        }
    }
}

#[derive(Tabled)]
struct WikiRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Tagline")]
    tagline: String,
}

#[derive(Tabled)]
struct ArticleRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
}

#[derive(Tabled)]
struct SearchRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Wiki")]
    wiki: String,
    #[tabled(rename = "Score")]
    score: i64,
}

/// Run a documentation command and print its output
pub async fn run_docs_command(command: DocsCommand, format: OutputFormat) -> CliResult<()> {
    let context = CliToolContext::new()?;
    let output = execute_docs_command(&context, &command, format).await?;
    println!("{output}");
    Ok(())
}

/// Run a documentation command and return what it would print
pub async fn execute_docs_command(
    context: &CliToolContext,
    command: &DocsCommand,
    format: OutputFormat,
) -> CliResult<String> {
    let (tool_name, pairs) = command.tool_call();
    if !context.has_tool(tool_name) && matches!(command, DocsCommand::Ask { .. }) {
        return Err(CliError::new(NO_AGENT_MESSAGE, EXIT_ERROR));
    }
    let arguments = context.create_arguments(pairs);
    let result = context.execute_tool(tool_name, arguments).await?;
    let text = tool_output(&result)?;

    if format == OutputFormat::Json && !matches!(command, DocsCommand::Ask { .. }) {
        return Ok(text);
    }

    match command {
        DocsCommand::Wikis => {
            let wikis: Vec<Wiki> = parse(&text)?;
            Ok(render_table(
                wikis.into_iter().map(|wiki| WikiRow {
                    id: wiki.wiki_id,
                    name: wiki.name,
                    tagline: wiki.tagline,
                }),
                "No wikis found.",
            ))
        }
        DocsCommand::Articles { .. } => {
            let articles: Vec<ArticleSummary> = parse(&text)?;
            Ok(render_article_rows(articles))
        }
        DocsCommand::Search { remote: true, .. } => {
            let hits: Vec<ArticleSummary> = parse(&text)?;
            Ok(render_article_rows(hits))
        }
        DocsCommand::Search { .. } => {
            let hits: Vec<SearchHit> = parse(&text)?;
            Ok(render_table(
                hits.into_iter().map(|hit| SearchRow {
                    id: hit.article_id,
                    title: hit.title,
                    wiki: hit.wiki_name.unwrap_or_default(),
                    score: hit.score,
                }),
                "No matching articles.",
            ))
        }
        DocsCommand::View { .. } => {
            let article: Article = parse(&text)?;
            Ok(render_article(&article))
        }
        DocsCommand::Ask { .. } => Ok(text),
    }
}

fn tool_output(result: &CallToolResult) -> CliResult<String> {
    if result.is_error.unwrap_or(false) {
        return Err(CliError::new(
            response_formatting::format_error_response(result, false),
            EXIT_WARNING,
        ));
    }
    Ok(response_formatting::extract_text_content(result).unwrap_or_default())
}

fn parse<T: DeserializeOwned>(text: &str) -> CliResult<T> {
    Ok(serde_json::from_str(text)?)
}

fn render_article_rows(articles: Vec<ArticleSummary>) -> String {
    render_table(
        articles.into_iter().map(|article| ArticleRow {
            id: article.article_id,
            title: article.title,
        }),
        "No articles found.",
    )
}

fn render_table<R: Tabled>(rows: impl IntoIterator<Item = R>, empty: &str) -> String {
    let rows: Vec<R> = rows.into_iter().collect();
    if rows.is_empty() {
        return empty.to_string();
    }

    let mut table = Table::new(rows);
    table.with(Style::modern());
    if Cli::should_use_color() {
        table.with(Modify::new(Rows::one(0)).with(Color::FG_BRIGHT_CYAN));
    }
    table.to_string()
}

fn render_article(article: &Article) -> String {
    let heading = format!("# {}", article.title);
    let heading = if Cli::should_use_color() {
        heading.bold().to_string()
    } else {
        heading
    };

    let mut output = format!("{heading}\n\n{}", article.content);
    if !article.tags.is_empty() {
        output.push_str(&format!("\n\nTags: {}", article.tags.join(", ")));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use fogbugz_mcp::mock_source::MockDocumentationSource;
    use fogbugz_mcp::McpServer;
    use std::sync::Arc;

    async fn mock_context() -> CliToolContext {
        let source = MockDocumentationSource::new();
        source.add_wiki(1, "Engineering").await;
        source
            .add_article(1, 10, "Release checklist", "1. Tag\n2. Deploy")
            .await;
        source.add_article(1, 11, "Release notes", "Highlights").await;
        CliToolContext::from_server(McpServer::with_source(Arc::new(source), 10))
    }

    #[test]
    fn test_search_tool_call_omits_unset_options() {
        let (name, args) = DocsCommand::Search {
            query: "deploy".to_string(),
            limit: None,
            remote: false,
        }
        .tool_call();
        assert_eq!(name, "search_articles");
        assert_eq!(args, vec![("query", json!("deploy"))]);
    }

    #[tokio::test]
    async fn test_wikis_table() {
        let context = mock_context().await;
        let output = execute_docs_command(&context, &DocsCommand::Wikis, OutputFormat::Table)
            .await
            .unwrap();
        assert!(output.contains("Name"));
        assert!(output.contains("Engineering"));
    }

    #[tokio::test]
    async fn test_articles_json_is_tool_output() {
        let context = mock_context().await;
        let output = execute_docs_command(
            &context,
            &DocsCommand::Articles { wiki_id: 1 },
            OutputFormat::Json,
        )
        .await
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["article_id"], 10);
        assert_eq!(value[1]["title"], "Release notes");
    }

    #[tokio::test]
    async fn test_search_table_shows_scores() {
        let context = mock_context().await;
        let command = DocsCommand::Search {
            query: "release checklist".to_string(),
            limit: Some(1),
            remote: false,
        };
        let output = execute_docs_command(&context, &command, OutputFormat::Table)
            .await
            .unwrap();
        assert!(output.contains("Release checklist"));
        assert!(!output.contains("Release notes"));
        assert!(output.contains("Score"));
    }

    #[tokio::test]
    async fn test_view_prints_markdown() {
        let context = mock_context().await;
        let output = execute_docs_command(
            &context,
            &DocsCommand::View { article_id: 10 },
            OutputFormat::Table,
        )
        .await
        .unwrap();
        assert!(output.contains("# Release checklist"));
        assert!(output.ends_with("1. Tag\n2. Deploy"));
    }

    #[tokio::test]
    async fn test_missing_article_maps_to_validation_exit_code() {
        let context = mock_context().await;
        let error = execute_docs_command(
            &context,
            &DocsCommand::View { article_id: 99 },
            OutputFormat::Table,
        )
        .await
        .unwrap_err();
        assert_eq!(error.exit_code, crate::exit_codes::EXIT_ERROR);
        assert!(error.message.contains("99"));
    }

    #[tokio::test]
    async fn test_ask_without_agent_fails() {
        let context = mock_context().await;
        let error = execute_docs_command(
            &context,
            &DocsCommand::Ask {
                query: "what ships next?".to_string(),
            },
            OutputFormat::Table,
        )
        .await
        .unwrap_err();
        assert_eq!(error.message, NO_AGENT_MESSAGE);
        assert_eq!(error.exit_code, EXIT_ERROR);
    }
}
