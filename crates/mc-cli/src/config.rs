//! CLI configuration.
//!
//! Values are resolved in order: command-line flag, environment variable,
//! configuration file, built-in default. Credentials are never read from
//! the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mc_directory::config::{DEFAULT_AUTHORITY_URL, DEFAULT_GRAPH_URL, DEFAULT_SCOPE};
use mc_directory::{GraphConfig, RetryPolicy};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::{CliError, CliResult};

/// CLI configuration file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Graph API root.
    #[serde(default = "default_graph_url")]
    pub graph_url: String,

    /// Identity platform authority.
    #[serde(default = "default_authority_url")]
    pub authority_url: String,

    /// OAuth2 scope for the client-credentials grant.
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Output format used when `--output` is not given.
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Retry settings for transient directory failures.
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_graph_url() -> String {
    DEFAULT_GRAPH_URL.to_string()
}

fn default_authority_url() -> String {
    DEFAULT_AUTHORITY_URL.to_string()
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            graph_url: default_graph_url(),
            authority_url: default_authority_url(),
            scope: default_scope(),
            request_timeout_secs: default_request_timeout_secs(),
            output_format: OutputFormat::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from `path`, or from the default location.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// file given explicitly is an error.
    ///
    /// ## Errors
    ///
    /// Returns `CliError::Config` if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let (config_path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_path()?, false),
        };

        if !config_path.exists() {
            if explicit {
                return Err(CliError::Config(format!(
                    "config file not found: {}",
                    config_path.display()
                )));
            }
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            CliError::Config(format!("failed to read {}: {e}", config_path.display()))
        })?;
        tracing::debug!(path = %config_path.display(), "Loaded config file");
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    ///
    /// ## Errors
    ///
    /// Returns `CliError::Config` on malformed TOML or unknown keys.
    pub fn from_toml(content: &str) -> CliResult<Self> {
        toml::from_str(content).map_err(|e| CliError::Config(format!("failed to parse config: {e}")))
    }

    /// Gets the default configuration file path.
    ///
    /// ## Errors
    ///
    /// Returns `CliError::Config` if the home directory is unknown.
    pub fn config_path() -> CliResult<PathBuf> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| CliError::Config("could not determine home directory".to_string()))?;
        Ok(home.join(".mgmtchain").join("config.toml"))
    }

    /// Gets the effective output format (from args or config).
    #[must_use]
    pub fn effective_output(&self, arg_output: Option<OutputFormat>) -> OutputFormat {
        arg_output.unwrap_or(self.output_format)
    }

    /// Builds the Graph client configuration, applying overrides from `cli`.
    ///
    /// ## Errors
    ///
    /// Returns `CliError::Auth` if a credential is missing and
    /// `CliError::Config` if an endpoint is invalid.
    pub fn graph_config(&self, cli: &Cli) -> CliResult<GraphConfig> {
        let mut builder = GraphConfig::builder()
            .graph_url(cli.graph_url.as_deref().unwrap_or(&self.graph_url))
            .authority_url(cli.authority_url.as_deref().unwrap_or(&self.authority_url))
            .scope(self.scope.as_str())
            .request_timeout(Duration::from_secs(self.request_timeout_secs))
            .retry(self.retry.policy());

        if let Some(tenant_id) = &cli.tenant_id {
            builder = builder.tenant_id(tenant_id.as_str());
        }
        if let Some(client_id) = &cli.client_id {
            builder = builder.client_id(client_id.as_str());
        }
        if let Some(secret) = &cli.client_secret {
            builder = builder.client_secret(secret.as_str());
        }

        Ok(builder.build()?)
    }
}

/// Output format.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `EmailAddress, ManagerEmailAddress` lines.
    #[default]
    Text,
    /// Human-readable table format.
    Table,
    /// JSON format.
    Json,
}

/// Retry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Retries after the first attempt. Zero disables retrying.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_initial_backoff_ms() -> u64 {
    500
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

impl RetryConfig {
    /// Converts to the directory retry policy.
    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            ..RetryPolicy::default()
        }
    }
}
