//! CLI argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::config::OutputFormat;

/// Lists the members of a group who report, directly or transitively, to a
/// manager.
#[derive(Debug, Parser)]
#[command(name = "mgmtchain")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Object ID of the group whose members are resolved.
    pub group_id: String,

    /// Mail address of the root manager.
    pub manager: String,

    /// Output format (overrides config, default `text`).
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Configuration file (default `~/.mgmtchain/config.toml`).
    #[arg(short, long, env = "MC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Graph API root (overrides config).
    #[arg(long, env = "MC_GRAPH_URL")]
    pub graph_url: Option<String>,

    /// Identity platform authority (overrides config).
    #[arg(long, env = "MC_AUTHORITY_URL")]
    pub authority_url: Option<String>,

    /// Directory tenant ID.
    #[arg(long, env = "TENANT_ID")]
    pub tenant_id: Option<String>,

    /// Application (client) ID.
    #[arg(long, env = "CLIENT_ID")]
    pub client_id: Option<String>,

    /// Application client secret.
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Stop recording members more than this many levels below the manager.
    #[arg(long)]
    pub max_depth: Option<usize>,
}
