//! # FogBugz MCP
//!
//! Read-only access to FogBugz wiki documentation for AI assistants.
//!
//! ## Features
//!
//! - **FogBugz client**: List wikis and articles and fetch article bodies over the XML API
//! - **Markdown conversion**: Article HTML rendered as Markdown, including tables and code snippets
//! - **Search**: Cached title index with keyword ranking and fuzzy fallback
//! - **MCP Support**: Model Context Protocol server exposing the documentation tools
//! - **Agent**: Optional LLM tool-calling loop that answers questions from the docs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fogbugz_mcp::{Config, FogBugzClient};
//!
//! # async fn run() -> fogbugz_mcp::Result<()> {
//! let config = Config::load()?;
//! let client = FogBugzClient::new(&config.fogbugz)?;
//!
//! for wiki in client.list_wikis().await? {
//!     println!("{} {}", wiki.wiki_id, wiki.name);
//! }
//!
//! let article = client.view_article(42).await?;
//! println!("{}", article.content);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Documentation agent driving an LLM tool-calling loop
pub mod agent;

/// FogBugz XML API client
pub mod client;

/// Shared helpers
pub mod common;

/// Configuration loading
pub mod config;

/// Error types
pub mod error;

/// HTML to Markdown conversion
pub mod markdown;

/// Model Context Protocol (MCP) server support
pub mod mcp;

/// In-memory documentation source for tests
pub mod mock_source;

/// Article index and keyword search
pub mod search;

/// Documentation source abstraction
pub mod source;

/// Wiki and article data types
pub mod types;

pub use agent::DocsAgent;
pub use client::FogBugzClient;
pub use config::{AgentConfig, Config, ConfigError, FogBugzConfig, LlmProvider};
pub use error::{FogBugzError, Result};
pub use markdown::html_to_markdown;
pub use mcp::McpServer;
pub use search::ArticleIndex;
pub use source::DocumentationSource;
pub use types::{Article, ArticleId, ArticleSummary, SearchHit, Wiki, WikiId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
