use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::io;
use std::net::SocketAddr;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transport {
    /// Newline-delimited JSON-RPC over stdin/stdout
    #[default]
    Stdio,
    /// HTTP server-sent events
    Sse,
}

/// Default address for the SSE transport
pub const DEFAULT_SSE_BIND: &str = "127.0.0.1:8000";

#[derive(Parser, Debug)]
#[command(name = "fogbugz-mcp")]
#[command(version)]
#[command(about = "An MCP server for FogBugz wiki documentation")]
#[command(long_about = "
fogbugz-mcp is an MCP (Model Context Protocol) server that gives AI
assistants read-only access to FogBugz wikis and articles. Articles are
returned as Markdown. The same tools can be called from the command line.

Configuration is read from fogbugz-mcp.yaml when present, then from the
environment (FOGBUGZ_URL, FOGBUGZ_TOKEN, OPENAI_API_KEY or
AZURE_OPENAI_API_KEY). A .env file in the working directory is loaded first.

Example usage:
  fogbugz-mcp serve                  # Run as MCP server over stdio
  fogbugz-mcp search deployment      # Search article titles
  fogbugz-mcp view 42                # Print an article as Markdown
  fogbugz-mcp doctor                 # Check configuration and connectivity
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose (trace) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format for documentation commands
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run as MCP server
    #[command(long_about = "
Runs fogbugz-mcp as an MCP server exposing the documentation tools:
list_wikis, list_articles, search_articles, view_article, ping and, when an
LLM is configured, ask_agent.

With the stdio transport, logs are written to ~/.fogbugz-mcp/mcp.log
(override the file name with FOGBUGZ_MCP_LOG_FILE) so stdout stays reserved
for the protocol.

Examples:
  fogbugz-mcp serve
  fogbugz-mcp serve --transport sse --bind 127.0.0.1:8000
")]
    Serve {
        /// Transport to serve on
        #[arg(long, value_enum, default_value_t = Transport::Stdio)]
        transport: Transport,

        /// Address to bind for the SSE transport
        #[arg(long, default_value = DEFAULT_SSE_BIND)]
        bind: SocketAddr,
    },
    /// List all wikis
    Wikis,
    /// List the articles in a wiki
    Articles {
        /// Wiki id as shown by `fogbugz-mcp wikis`
        wiki_id: i64,
    },
    /// Search articles by keyword
    #[command(long_about = "
Searches article titles across every wiki. Results are ranked by how many
query words appear in the title, with a bonus when the whole query appears.
If nothing matches a keyword, fuzzy matching is used instead.

With --remote the query is sent to FogBugz full-text search instead.

Examples:
  fogbugz-mcp search \"release checklist\"
  fogbugz-mcp search deploy --limit 5
  fogbugz-mcp search kubernetes --remote --format json
")]
    Search {
        /// Words to search for
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Use FogBugz server-side full-text search
        #[arg(long)]
        remote: bool,
    },
    /// Show an article as Markdown
    View {
        /// Article id as shown by `articles` or `search`
        article_id: i64,
    },
    /// Ask the documentation agent a question
    #[command(long_about = "
Sends a question to the documentation agent. The agent looks through the
wikis with the same tools the MCP server exposes and answers from what it
finds. Requires OPENAI_API_KEY or AZURE_OPENAI_API_KEY.

Example:
  fogbugz-mcp ask \"How do I rotate the staging certificates?\"
")]
    Ask {
        /// The question to answer
        query: String,
    },
    /// Diagnose configuration and connectivity issues
    #[command(long_about = "
Runs diagnostics to help troubleshoot setup issues:

- FogBugz URL and API token are configured
- The URL is a valid http(s) address
- FogBugz answers listWikis with the configured token
- An LLM is configured for ask_agent

Exit codes:
  0 - All checks passed
  1 - Warnings found
  2 - Errors found
")]
    Doctor,
    /// Generate shell completion scripts
    #[command(long_about = "
Generates shell completion scripts for various shells.

Examples:
  fogbugz-mcp completion bash > ~/.bash_completion.d/fogbugz-mcp
  fogbugz-mcp completion zsh > ~/.zfunc/_fogbugz-mcp
  fogbugz-mcp completion fish > ~/.config/fish/completions/fogbugz-mcp.fish
")]
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Commands {
    /// Whether this is `serve` over stdio, where stdout belongs to the protocol
    pub fn is_stdio_server(&self) -> bool {
        matches!(
            self,
            Commands::Serve {
                transport: Transport::Stdio,
                ..
            }
        )
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    #[allow(dead_code)]
    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }

    pub fn is_tty() -> bool {
        io::stdout().is_terminal()
    }

    pub fn should_use_color() -> bool {
        Self::is_tty() && std::env::var("NO_COLOR").is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_help_works() {
        let error = Cli::try_parse_from_args(["fogbugz-mcp", "--help"]).unwrap_err();
        assert_eq!(error.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_works() {
        let error = Cli::try_parse_from_args(["fogbugz-mcp", "--version"]).unwrap_err();
        assert_eq!(error.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_no_subcommand() {
        let cli = Cli::try_parse_from_args(["fogbugz-mcp"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.debug);
        assert!(!cli.quiet);
        assert_eq!(cli.format, OutputFormat::Table);
    }

    #[test]
    fn test_serve_defaults_to_stdio() {
        let cli = Cli::try_parse_from_args(["fogbugz-mcp", "serve"]).unwrap();
        let command = cli.command.unwrap();
        assert!(command.is_stdio_server());
        match command {
            Commands::Serve { transport, bind } => {
                assert_eq!(transport, Transport::Stdio);
                assert_eq!(bind.to_string(), DEFAULT_SSE_BIND);
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn test_serve_sse_with_bind() {
        let cli = Cli::try_parse_from_args([
            "fogbugz-mcp",
            "serve",
            "--transport",
            "sse",
            "--bind",
            "0.0.0.0:9000",
        ])
        .unwrap();
        let command = cli.command.unwrap();
        assert!(!command.is_stdio_server());
        match command {
            Commands::Serve { transport, bind } => {
                assert_eq!(transport, Transport::Sse);
                assert_eq!(bind.port(), 9000);
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn test_serve_rejects_bad_bind_address() {
        let result =
            Cli::try_parse_from_args(["fogbugz-mcp", "serve", "--bind", "not-an-address"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_search_options() {
        let cli = Cli::try_parse_from_args([
            "fogbugz-mcp",
            "search",
            "release checklist",
            "--limit",
            "3",
            "--remote",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Some(Commands::Search {
                query,
                limit,
                remote,
            }) => {
                assert_eq!(query, "release checklist");
                assert_eq!(limit, Some(3));
                assert!(remote);
            }
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn test_view_requires_numeric_id() {
        assert!(Cli::try_parse_from_args(["fogbugz-mcp", "view", "abc"]).is_err());

        let cli = Cli::try_parse_from_args(["fogbugz-mcp", "view", "42"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::View { article_id: 42 })));
    }

    #[test]
    fn test_articles_and_ask() {
        let cli = Cli::try_parse_from_args(["fogbugz-mcp", "-q", "articles", "7"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::Articles { wiki_id: 7 })));

        let cli = Cli::try_parse_from_args(["fogbugz-mcp", "ask", "where are the runbooks?"])
            .unwrap();
        match cli.command {
            Some(Commands::Ask { query }) => assert_eq!(query, "where are the runbooks?"),
            other => panic!("expected ask, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from_args(["fogbugz-mcp", "wikis", "--debug"]).unwrap();
        assert!(cli.debug);
        assert!(matches!(cli.command, Some(Commands::Wikis)));
    }

    #[test]
    fn test_completion_subcommand() {
        let cli = Cli::try_parse_from_args(["fogbugz-mcp", "completion", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completion {
                shell: clap_complete::Shell::Zsh
            })
        ));
    }
}
