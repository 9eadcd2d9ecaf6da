//! Check implementations for the doctor module

use super::types::*;
use crate::logging;
use fogbugz_mcp::{Config, ConfigError, FogBugzClient, FogBugzConfig, FogBugzError, LlmProvider};

/// Check names constants to avoid typos and improve maintainability
pub mod check_names {
    pub const CONFIGURATION: &str = "Configuration";
    pub const TOKEN: &str = "FogBugz API token";
    pub const URL: &str = "FogBugz URL";
    pub const LOG_DIRECTORY: &str = "MCP log directory";
    pub const REACHABLE: &str = "FogBugz listWikis";
    pub const AGENT: &str = "Documentation agent";
}

/// Load the configuration, recording whether it resolved
///
/// Returns the configuration when it loaded so later checks can use it.
pub fn check_configuration(checks: &mut Vec<Check>) -> Option<Config> {
    let config_file = Config::find_yaml_config_file();
    let result = Config::load_from(config_file.as_deref());
    record_configuration(checks, result, config_file.as_deref())
}

fn record_configuration(
    checks: &mut Vec<Check>,
    result: Result<Config, ConfigError>,
    config_file: Option<&std::path::Path>,
) -> Option<Config> {
    let source = match config_file {
        Some(path) => format!("environment and {}", path.display()),
        None => "environment".to_string(),
    };

    match result {
        Ok(config) => {
            checks.push(
                Check::new(
                    check_names::CONFIGURATION,
                    CheckCategory::Configuration,
                    CheckStatus::Ok,
                )
                .with_message(format!("Loaded from {source}"))
                .build(),
            );
            checks.push(
                Check::new(check_names::TOKEN, CheckCategory::Configuration, CheckStatus::Ok)
                    .with_message(format!("Set ({} characters)", config.fogbugz.token.len()))
                    .build(),
            );
            Some(config)
        }
        Err(ConfigError::Missing { name }) => {
            checks.push(
                Check::new(
                    check_names::CONFIGURATION,
                    CheckCategory::Configuration,
                    CheckStatus::Error,
                )
                .with_message(format!("{name} is not set"))
                .with_fix(format!(
                    "Set {name} in the environment, a .env file or fogbugz-mcp.yaml"
                ))
                .build(),
            );
            None
        }
        Err(error) => {
            checks.push(
                Check::new(
                    check_names::CONFIGURATION,
                    CheckCategory::Configuration,
                    CheckStatus::Error,
                )
                .with_message(error.to_string())
                .with_fix(format!("Fix the configuration loaded from {source}"))
                .build(),
            );
            None
        }
    }
}

/// Check that the base URL parses as an http(s) address
///
/// Returns false when the URL is unusable and connectivity checks should be skipped.
pub fn check_base_url(checks: &mut Vec<Check>, fogbugz: &FogBugzConfig) -> bool {
    let check = |status: CheckStatus| Check::new(check_names::URL, CheckCategory::Configuration, status);

    let url = match url::Url::parse(&fogbugz.base_url) {
        Ok(url) => url,
        Err(e) => {
            checks.push(
                check(CheckStatus::Error)
                    .with_message(format!("'{}' is not a valid URL: {e}", fogbugz.base_url))
                    .with_fix("Use the full address, e.g. https://example.fogbugz.com")
                    .build(),
            );
            return false;
        }
    };

    match url.scheme() {
        "https" => {
            checks.push(check(CheckStatus::Ok).with_message(url.as_str()).build());
            true
        }
        "http" => {
            checks.push(
                check(CheckStatus::Warning)
                    .with_message(format!("{url} does not use TLS; the API token is sent in clear text"))
                    .with_fix("Use an https:// URL")
                    .build(),
            );
            true
        }
        scheme => {
            checks.push(
                check(CheckStatus::Error)
                    .with_message(format!("Unsupported scheme '{scheme}'"))
                    .with_fix("Use an https:// URL")
                    .build(),
            );
            false
        }
    }
}

/// Call `listWikis` with the configured token
pub async fn check_fogbugz_reachable(checks: &mut Vec<Check>, fogbugz: &FogBugzConfig) {
    let check = |status: CheckStatus| Check::new(check_names::REACHABLE, CheckCategory::Connectivity, status);

    let result = match FogBugzClient::new(fogbugz) {
        Ok(client) => client.list_wikis().await,
        Err(e) => Err(e),
    };

    let built = match result {
        Ok(wikis) if wikis.is_empty() => check(CheckStatus::Warning)
            .with_message("Connected, but no wikis are visible to this token")
            .with_fix("Check the token's permissions in FogBugz")
            .build(),
        Ok(wikis) => {
            let noun = if wikis.len() == 1 { "wiki" } else { "wikis" };
            check(CheckStatus::Ok)
                .with_message(format!("{} {noun} visible", wikis.len()))
                .build()
        }
        Err(FogBugzError::Api { code, message }) if code == FogBugzError::NOT_LOGGED_ON => {
            check(CheckStatus::Error)
                .with_message(format!("FogBugz rejected the token: {message}"))
                .with_fix("Generate a new API token in FogBugz and update FOGBUGZ_TOKEN")
                .build()
        }
        Err(e) => check(CheckStatus::Error)
            .with_message(e.to_string())
            .with_fix("Check FOGBUGZ_URL and your network connection")
            .build(),
    };
    checks.push(built);
}

/// Check whether an LLM is configured for `ask_agent`
pub fn check_agent(checks: &mut Vec<Check>, config: &Config) {
    let check = |status: CheckStatus| Check::new(check_names::AGENT, CheckCategory::Agent, status);

    let built = match &config.agent {
        Some(agent) => {
            let provider = match agent.provider {
                LlmProvider::OpenAi => "OpenAI",
                LlmProvider::Azure => "Azure OpenAI",
            };
            check(CheckStatus::Ok)
                .with_message(format!(
                    "{provider} model {} at {}",
                    agent.model, agent.endpoint
                ))
                .build()
        }
        None => check(CheckStatus::Warning)
            .with_message("No LLM configured; ask_agent is disabled")
            .with_fix("Set OPENAI_API_KEY, or AZURE_OPENAI_API_KEY with AZURE_OPENAI_ENDPOINT")
            .build(),
    };
    checks.push(built);
}

/// Check that the MCP log directory exists or can be created
pub fn check_log_directory(checks: &mut Vec<Check>) {
    let dir = logging::log_directory();
    let check = |status: CheckStatus| Check::new(check_names::LOG_DIRECTORY, CheckCategory::Configuration, status);

    let built = match std::fs::create_dir_all(&dir) {
        Ok(()) => check(CheckStatus::Ok)
            .with_message(format!("Logging to {}", logging::log_file_path().display()))
            .build(),
        Err(e) => check(CheckStatus::Warning)
            .with_message(format!("Cannot create {}: {e}", dir.display()))
            .with_fix("Stdio server logs will fall back to stderr")
            .build(),
    };
    checks.push(built);
}
