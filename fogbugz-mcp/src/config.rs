//! Configuration management for FogBugz MCP
//!
//! Settings are resolved from three layers, lowest precedence first:
//! 1. Built-in defaults
//! 2. Environment variables (`FOGBUGZ_URL`, `FOGBUGZ_TOKEN`, `OPENAI_API_KEY`, ...)
//! 3. An optional `fogbugz-mcp.yaml` file
//!
//! The FogBugz URL and token have no defaults; loading fails when neither the
//! environment nor the YAML file provides them.

use crate::common::env_loader::{load_env_nonempty, EnvLoader};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILENAME: &str = "fogbugz-mcp.yaml";
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_SEARCH_LIMIT: usize = 20;
const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_AZURE_API_VERSION: &str = "2024-02-01";
const DEFAULT_AGENT_MAX_ITERATIONS: usize = 8;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        /// Path to the configuration file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML content from a configuration file
    #[error("Invalid YAML syntax in {path}:\n{source}\n\nHint: Check for proper indentation and YAML formatting")]
    YamlParse {
        /// Path to the configuration file with invalid YAML content
        path: PathBuf,
        /// Underlying YAML parsing error
        #[source]
        source: serde_yaml::Error,
    },

    /// A required setting was not provided anywhere
    #[error("Missing configuration: {name} must be set")]
    Missing {
        /// Environment variable (or YAML key) that is missing
        name: String,
    },

    /// Invalid configuration value for a specific field
    #[error("Invalid configuration value for '{field}': {value}\n{hint}")]
    InvalidValue {
        /// Name of the configuration field
        field: String,
        /// The invalid value that was provided
        value: String,
        /// Helpful hint about how to fix the issue
        hint: String,
    },
}

/// Connection settings for the FogBugz XML API
#[derive(Clone, PartialEq, Eq)]
pub struct FogBugzConfig {
    /// Base URL of the FogBugz installation, without trailing slash
    pub base_url: String,
    /// API token sent with every request
    pub token: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl FogBugzConfig {
    /// Create a config with the default timeout
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for FogBugzConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FogBugzConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Chat completion provider used by the documentation agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// api.openai.com or a compatible endpoint
    OpenAi,
    /// Azure OpenAI deployment
    Azure,
}

/// Settings for the LLM that backs the `ask_agent` tool
#[derive(Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Which chat completion API flavour to speak
    pub provider: LlmProvider,
    /// API key
    pub api_key: String,
    /// OpenAI base URL or Azure resource endpoint
    pub endpoint: String,
    /// Model name (OpenAI) or deployment name (Azure)
    pub model: String,
    /// Azure `api-version` query parameter
    pub api_version: String,
    /// Upper bound on model round trips per question
    pub max_iterations: usize,
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_version", &self.api_version)
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}

/// Fully resolved application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// FogBugz API connection
    pub fogbugz: FogBugzConfig,
    /// Default number of hits returned by `search_articles`
    pub search_limit: usize,
    /// LLM settings; `None` disables the agent
    pub agent: Option<AgentConfig>,
}

impl Config {
    /// Load configuration from environment variables and the first YAML file found
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::find_yaml_config_file().as_deref())
    }

    /// Load configuration from environment variables and an explicit YAML file
    pub fn load_from(yaml_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut raw = RawConfig::from_env();
        if let Some(path) = yaml_path {
            let yaml = RawConfig::from_yaml_file(path)?;
            tracing::debug!("Applying configuration file {}", path.display());
            raw.apply(yaml);
        }
        raw.resolve()
    }

    /// Find the fogbugz-mcp.yaml configuration file
    ///
    /// The search order is:
    /// 1. Current working directory: `fogbugz-mcp.yaml`
    /// 2. `~/.config/fogbugz-mcp/fogbugz-mcp.yaml`
    /// 3. `~/fogbugz-mcp.yaml`
    pub fn find_yaml_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(CONFIG_FILENAME)];

        if let Some(home_dir) = dirs::home_dir() {
            search_paths.push(
                home_dir
                    .join(".config")
                    .join("fogbugz-mcp")
                    .join(CONFIG_FILENAME),
            );
            search_paths.push(home_dir.join(CONFIG_FILENAME));
        }

        let found = search_paths.into_iter().find(|path| path.is_file());
        match &found {
            Some(path) => tracing::debug!("Found configuration file: {:?}", path),
            None => tracing::debug!("No {} found in any search location", CONFIG_FILENAME),
        }
        found
    }
}

/// Unresolved configuration layer; every field optional so layers can be merged
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// FogBugz connection settings
    pub fogbugz: RawFogBugz,
    /// Default search hit limit
    pub search_limit: Option<usize>,
    /// Agent settings
    pub agent: RawAgent,
}

/// Unresolved FogBugz section
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawFogBugz {
    /// Base URL
    pub url: Option<String>,
    /// API token
    pub token: Option<String>,
    /// Timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Unresolved agent section
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawAgent {
    /// Provider; inferred from which API key is present when absent
    pub provider: Option<LlmProvider>,
    /// API key
    pub api_key: Option<String>,
    /// Endpoint
    pub endpoint: Option<String>,
    /// Model or deployment
    pub model: Option<String>,
    /// Azure API version
    pub api_version: Option<String>,
    /// Maximum model round trips
    pub max_iterations: Option<usize>,
}

impl RawConfig {
    /// Read the environment layer
    pub fn from_env() -> Self {
        let loader = EnvLoader::new("FOGBUGZ");

        let fogbugz = RawFogBugz {
            url: loader.load_optional("URL"),
            token: loader.load_optional("TOKEN"),
            timeout_secs: loader.load_parsed("TIMEOUT_SECS"),
        };

        let mut agent = RawAgent {
            max_iterations: loader.load_parsed("AGENT_MAX_ITERATIONS"),
            ..RawAgent::default()
        };

        if let Some(key) = load_env_nonempty("AZURE_OPENAI_API_KEY") {
            agent.provider = Some(LlmProvider::Azure);
            agent.api_key = Some(key);
            agent.endpoint = load_env_nonempty("AZURE_OPENAI_ENDPOINT");
            agent.model = load_env_nonempty("AZURE_OPENAI_MODEL");
            agent.api_version = load_env_nonempty("AZURE_OPENAI_API_VERSION");
        } else if let Some(key) = load_env_nonempty("OPENAI_API_KEY") {
            agent.provider = Some(LlmProvider::OpenAi);
            agent.api_key = Some(key);
            agent.endpoint = load_env_nonempty("OPENAI_BASE_URL");
            agent.model = load_env_nonempty("OPENAI_MODEL");
        }

        Self {
            fogbugz,
            search_limit: loader.load_parsed("SEARCH_LIMIT"),
            agent,
        }
    }

    /// Parse a YAML layer from a string
    pub fn from_yaml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|source| ConfigError::YamlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse a YAML layer from disk
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content, path)
    }

    /// Overlay `other` on top of this layer; values present in `other` win
    pub fn apply(&mut self, other: RawConfig) {
        fn overlay<T>(target: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *target = value;
            }
        }

        overlay(&mut self.fogbugz.url, other.fogbugz.url);
        overlay(&mut self.fogbugz.token, other.fogbugz.token);
        overlay(&mut self.fogbugz.timeout_secs, other.fogbugz.timeout_secs);
        overlay(&mut self.search_limit, other.search_limit);
        overlay(&mut self.agent.provider, other.agent.provider);
        overlay(&mut self.agent.api_key, other.agent.api_key);
        overlay(&mut self.agent.endpoint, other.agent.endpoint);
        overlay(&mut self.agent.model, other.agent.model);
        overlay(&mut self.agent.api_version, other.agent.api_version);
        overlay(&mut self.agent.max_iterations, other.agent.max_iterations);
    }

    /// Validate and apply defaults
    pub fn resolve(self) -> Result<Config, ConfigError> {
        let url = self
            .fogbugz
            .url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                name: "FOGBUGZ_URL".to_string(),
            })?;
        let token = self
            .fogbugz
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                name: "FOGBUGZ_TOKEN".to_string(),
            })?;

        validate_http_url("fogbugz.url", &url)?;

        let timeout_secs = self.fogbugz.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fogbugz.timeout_secs".to_string(),
                value: "0".to_string(),
                hint: "Timeout must be at least one second".to_string(),
            });
        }

        let search_limit = self.search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        if search_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search_limit".to_string(),
                value: "0".to_string(),
                hint: "Search limit must be at least 1".to_string(),
            });
        }

        let mut fogbugz = FogBugzConfig::new(url, token);
        fogbugz.timeout_secs = timeout_secs;

        Ok(Config {
            fogbugz,
            search_limit,
            agent: Self::resolve_agent(self.agent)?,
        })
    }

    fn resolve_agent(raw: RawAgent) -> Result<Option<AgentConfig>, ConfigError> {
        let Some(api_key) = raw.api_key.filter(|key| !key.trim().is_empty()) else {
            return Ok(None);
        };
        let provider = raw.provider.unwrap_or(LlmProvider::OpenAi);

        let endpoint = match (provider, raw.endpoint) {
            (_, Some(endpoint)) => endpoint,
            (LlmProvider::OpenAi, None) => DEFAULT_OPENAI_ENDPOINT.to_string(),
            (LlmProvider::Azure, None) => {
                return Err(ConfigError::Missing {
                    name: "AZURE_OPENAI_ENDPOINT".to_string(),
                })
            }
        };
        validate_http_url("agent.endpoint", &endpoint)?;

        let max_iterations = raw.max_iterations.unwrap_or(DEFAULT_AGENT_MAX_ITERATIONS);
        if max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "agent.max_iterations".to_string(),
                value: "0".to_string(),
                hint: "The agent needs at least one model call".to_string(),
            });
        }

        Ok(Some(AgentConfig {
            provider,
            api_key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: raw.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_version: raw
                .api_version
                .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
            max_iterations,
        }))
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            hint: "Expected an absolute http:// or https:// URL".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::io::Write;

    const ENV_KEYS: &[&str] = &[
        "FOGBUGZ_URL",
        "FOGBUGZ_TOKEN",
        "FOGBUGZ_TIMEOUT_SECS",
        "FOGBUGZ_SEARCH_LIMIT",
        "FOGBUGZ_AGENT_MAX_ITERATIONS",
        "AZURE_OPENAI_API_KEY",
        "AZURE_OPENAI_ENDPOINT",
        "AZURE_OPENAI_MODEL",
        "AZURE_OPENAI_API_VERSION",
        "OPENAI_API_KEY",
        "OPENAI_BASE_URL",
        "OPENAI_MODEL",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            env::remove_var(key);
        }
    }

    fn raw(url: Option<&str>, token: Option<&str>) -> RawConfig {
        RawConfig {
            fogbugz: RawFogBugz {
                url: url.map(String::from),
                token: token.map(String::from),
                timeout_secs: None,
            },
            ..RawConfig::default()
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let config = raw(Some("https://example.fogbugz.com/"), Some("abc"))
            .resolve()
            .unwrap();
        assert_eq!(config.fogbugz.base_url, "https://example.fogbugz.com");
        assert_eq!(config.fogbugz.token, "abc");
        assert_eq!(config.fogbugz.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.search_limit, DEFAULT_SEARCH_LIMIT);
        assert!(config.agent.is_none());
    }

    #[test]
    fn test_resolve_missing_url_and_token() {
        let err = raw(None, Some("abc")).resolve().unwrap_err();
        assert!(matches!(err, ConfigError::Missing { ref name } if name == "FOGBUGZ_URL"));

        let err = raw(Some("https://example.fogbugz.com"), Some("  "))
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing { ref name } if name == "FOGBUGZ_TOKEN"));
    }

    #[test]
    fn test_resolve_rejects_invalid_url() {
        let err = raw(Some("ftp://example.com"), Some("abc"))
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = raw(Some("not a url"), Some("abc")).resolve().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_resolve_rejects_zero_timeout() {
        let mut layer = raw(Some("https://example.fogbugz.com"), Some("abc"));
        layer.fogbugz.timeout_secs = Some(0);
        assert!(layer.resolve().is_err());
    }

    #[test]
    fn test_azure_requires_endpoint() {
        let mut layer = raw(Some("https://example.fogbugz.com"), Some("abc"));
        layer.agent.provider = Some(LlmProvider::Azure);
        layer.agent.api_key = Some("key".to_string());
        let err = layer.resolve().unwrap_err();
        assert!(matches!(err, ConfigError::Missing { ref name } if name == "AZURE_OPENAI_ENDPOINT"));
    }

    #[test]
    fn test_openai_agent_defaults() {
        let mut layer = raw(Some("https://example.fogbugz.com"), Some("abc"));
        layer.agent.api_key = Some("sk-test".to_string());
        let agent = layer.resolve().unwrap().agent.unwrap();
        assert_eq!(agent.provider, LlmProvider::OpenAi);
        assert_eq!(agent.endpoint, DEFAULT_OPENAI_ENDPOINT);
        assert_eq!(agent.model, DEFAULT_MODEL);
        assert_eq!(agent.max_iterations, DEFAULT_AGENT_MAX_ITERATIONS);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = FogBugzConfig::new("https://example.fogbugz.com", "super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_yaml_overrides_env_layer() {
        let mut base = raw(Some("https://env.fogbugz.com"), Some("env-token"));
        let yaml = RawConfig::from_yaml_str(
            "fogbugz:\n  url: https://yaml.fogbugz.com\n  timeout_secs: 45\nsearch_limit: 5\n",
            Path::new("fogbugz-mcp.yaml"),
        )
        .unwrap();
        base.apply(yaml);

        let config = base.resolve().unwrap();
        assert_eq!(config.fogbugz.base_url, "https://yaml.fogbugz.com");
        assert_eq!(config.fogbugz.token, "env-token");
        assert_eq!(config.fogbugz.timeout_secs, 45);
        assert_eq!(config.search_limit, 5);
    }

    #[test]
    fn test_yaml_parse_error_names_file() {
        let err = RawConfig::from_yaml_str("fogbugz: [unclosed", Path::new("bad.yaml")).unwrap_err();
        assert!(err.to_string().contains("bad.yaml"));

        let err =
            RawConfig::from_yaml_str("unknown_key: 1\n", Path::new("bad.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::YamlParse { .. }));
    }

    #[test]
    #[serial]
    fn test_from_env_prefers_azure() {
        clear_env();
        env::set_var("FOGBUGZ_URL", "https://example.fogbugz.com");
        env::set_var("FOGBUGZ_TOKEN", "abc");
        env::set_var("FOGBUGZ_TIMEOUT_SECS", "60");
        env::set_var("OPENAI_API_KEY", "sk-openai");
        env::set_var("AZURE_OPENAI_API_KEY", "azure-key");
        env::set_var("AZURE_OPENAI_ENDPOINT", "https://my-resource.openai.azure.com/");
        env::set_var("AZURE_OPENAI_MODEL", "gpt-4o");

        let config = RawConfig::from_env().resolve().unwrap();
        clear_env();

        assert_eq!(config.fogbugz.timeout_secs, 60);
        let agent = config.agent.unwrap();
        assert_eq!(agent.provider, LlmProvider::Azure);
        assert_eq!(agent.api_key, "azure-key");
        assert_eq!(agent.endpoint, "https://my-resource.openai.azure.com");
        assert_eq!(agent.model, "gpt-4o");
        assert_eq!(agent.api_version, DEFAULT_AZURE_API_VERSION);
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "fogbugz:\n  url: https://file.fogbugz.com\n  token: file-token\nagent:\n  provider: openai\n  api_key: sk-file\n  max_iterations: 3"
        )
        .unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.fogbugz.base_url, "https://file.fogbugz.com");
        assert_eq!(config.agent.unwrap().max_iterations, 3);
    }

    #[test]
    #[serial]
    fn test_load_from_missing_file() {
        clear_env();
        let err = Config::load_from(Some(Path::new("/nonexistent/fogbugz-mcp.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }
}
