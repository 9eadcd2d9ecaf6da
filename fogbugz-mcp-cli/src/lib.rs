//! fogbugz-mcp CLI library
//!
//! Command-line definitions, the documentation commands, diagnostics and the
//! plumbing shared by the `fogbugz-mcp` binary and its tests.

/// Command-line interface definitions and argument parsing
pub mod cli;
/// Shell completion scripts
pub mod completions;
/// The `wikis`, `articles`, `search`, `view` and `ask` commands
pub mod docs;
/// The `doctor` command
pub mod doctor;
/// CLI error type carrying an exit code
pub mod error;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// Log file location and writer for stdio MCP mode
pub mod logging;
/// Calling MCP tools from CLI commands
pub mod mcp_integration;
