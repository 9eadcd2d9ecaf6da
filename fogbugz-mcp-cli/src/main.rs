use std::net::SocketAddr;
use std::process;
use std::sync::{Arc, Mutex};

use clap::CommandFactory;
use fogbugz_mcp::{Config, McpServer};
use fogbugz_mcp_cli::cli::{Cli, Commands, OutputFormat, Transport};
use fogbugz_mcp_cli::docs::{self, DocsCommand};
use fogbugz_mcp_cli::doctor::Doctor;
use fogbugz_mcp_cli::error::handle_cli_result;
use fogbugz_mcp_cli::exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_WARNING};
use fogbugz_mcp_cli::{completions, logging};
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// `.env` location checked before the working directory's own `.env`
const AZURE_CLIENT_ENV_FILE: &str = "azure-openai-client/.env";

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let Some(command) = cli.command else {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Failed to print help: {e}");
            process::exit(EXIT_WARNING);
        }
        process::exit(EXIT_SUCCESS);
    };

    load_env_files();

    use is_terminal::IsTerminal;
    let is_mcp_mode = command.is_stdio_server() && !std::io::stdin().is_terminal();

    let log_level = if is_mcp_mode {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::TRACE
    } else if cli.debug {
        Level::DEBUG
    } else {
        Level::WARN
    };
    init_tracing(log_level, command.is_stdio_server());

    let exit_code = match command {
        Commands::Serve { transport, bind } => {
            tracing::info!("Starting MCP server ({:?})", transport);
            run_server(transport, bind).await
        }
        Commands::Doctor => {
            tracing::info!("Running diagnostics");
            Doctor::new().run_diagnostics().await
        }
        Commands::Completion { shell } => {
            tracing::info!("Generating completion for {:?}", shell);
            run_completions(shell)
        }
        Commands::Wikis => run_docs(DocsCommand::Wikis, cli.format).await,
        Commands::Articles { wiki_id } => {
            run_docs(DocsCommand::Articles { wiki_id }, cli.format).await
        }
        Commands::Search {
            query,
            limit,
            remote,
        } => {
            run_docs(
                DocsCommand::Search {
                    query,
                    limit,
                    remote,
                },
                cli.format,
            )
            .await
        }
        Commands::View { article_id } => {
            run_docs(DocsCommand::View { article_id }, cli.format).await
        }
        Commands::Ask { query } => run_docs(DocsCommand::Ask { query }, cli.format).await,
    };

    process::exit(exit_code);
}

/// dotenvy never overrides a variable that is already set, so the file
/// loaded first wins
fn load_env_files() {
    if std::path::Path::new(AZURE_CLIENT_ENV_FILE).is_file() {
        if let Err(e) = dotenvy::from_filename(AZURE_CLIENT_ENV_FILE) {
            eprintln!("Warning: failed to load {AZURE_CLIENT_ENV_FILE}: {e}");
        }
    }
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: failed to load .env: {e}");
        }
    }
}

/// `RUST_LOG` wins over the level picked from the command-line flags
fn env_filter(default_level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string().to_lowercase()))
}

fn init_tracing(log_level: Level, stdio_server: bool) {
    if stdio_server {
        match logging::open_log_file() {
            Ok(file) => {
                let writer = logging::FileWriterGuard::new(Arc::new(Mutex::new(file)));
                tracing_subscriber::fmt()
                    .with_writer(move || writer.clone())
                    .with_env_filter(env_filter(log_level))
                    .with_ansi(false)
                    .init();
                return;
            }
            Err(e) => {
                eprintln!(
                    "Failed to open {}, logging to stderr: {e}",
                    logging::log_file_path().display()
                );
            }
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(log_level))
        .init();
}

async fn run_docs(command: DocsCommand, format: OutputFormat) -> i32 {
    handle_cli_result(docs::run_docs_command(command, format).await)
}

async fn run_server(transport: Transport, bind: SocketAddr) -> i32 {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            eprintln!("Error: {e}");
            return EXIT_ERROR;
        }
    };

    let server = match McpServer::new(&config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to create MCP server: {}", e);
            eprintln!("Error: {e}");
            return EXIT_WARNING;
        }
    };

    let ct = CancellationToken::new();
    let ct_clone = ct.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!("Failed to listen for ctrl+c: {}", e),
        }
        ct_clone.cancel();
    });

    match transport {
        Transport::Stdio => serve_stdio(server, ct).await,
        Transport::Sse => serve_sse(server, bind, ct).await,
    }
}

async fn serve_stdio(server: McpServer, ct: CancellationToken) -> i32 {
    use rmcp::serve_server;
    use rmcp::transport::io::stdio;

    match serve_server(server, stdio()).await {
        Ok(running) => {
            tracing::info!("MCP server started on stdio");
            tokio::select! {
                quit = running.waiting() => {
                    tracing::info!("MCP client disconnected: {:?}", quit);
                }
                _ = ct.cancelled() => {}
            }
            tracing::info!("MCP server exited successfully");
            EXIT_SUCCESS
        }
        Err(e) => {
            tracing::error!("MCP server error: {}", e);
            EXIT_WARNING
        }
    }
}

async fn serve_sse(server: McpServer, bind: SocketAddr, ct: CancellationToken) -> i32 {
    use rmcp::transport::sse_server::SseServer;

    let sse = match SseServer::serve(bind).await {
        Ok(sse) => sse,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", bind, e);
            eprintln!("Error: failed to bind {bind}: {e}");
            return EXIT_WARNING;
        }
    };

    let service_ct = sse.with_service(move || server.clone());
    tracing::info!("MCP server listening on http://{}/sse", bind);
    eprintln!("Serving MCP over SSE at http://{bind}/sse");

    ct.cancelled().await;
    service_ct.cancel();
    tracing::info!("MCP server exited successfully");
    EXIT_SUCCESS
}

fn run_completions(shell: clap_complete::Shell) -> i32 {
    match completions::print_completion(shell) {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            tracing::error!("Completion error: {}", e);
            EXIT_WARNING
        }
    }
}
