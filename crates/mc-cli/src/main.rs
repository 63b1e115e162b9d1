//! # mgmtchain
//!
//! Prints which members of a directory group report to a given manager.

#![forbid(unsafe_code)]

use clap::Parser;
use mc_cli::{cli::Cli, commands::run_resolve, config::CliConfig, output::error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load configuration
    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {e}"));
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = run_resolve(&cli, &config).await {
        error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}

/// Logs to stderr so stdout carries only the report.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info,mc_cli=debug,mc_directory=debug,mc_hierarchy=debug")
    } else {
        EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
