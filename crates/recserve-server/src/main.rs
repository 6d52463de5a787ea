//! Recommendation server binary.
//!
//! Loads the similarity, personal and default-ranking snapshots, then serves
//! newline-delimited JSON-RPC 2.0 on stdio. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use recserve_core::ServingConfig;
use recserve_server::RecServer;

/// Recommendation server - offline, online and blended recommendations
#[derive(Parser)]
#[command(name = "recserve-server")]
#[command(version)]
#[command(about = "Serves offline, online and blended recommendations over stdio JSON-RPC")]
struct Cli {
    /// Path to a TOML config file (defaults apply when omitted)
    #[arg(short, long, env = "RECSERVE_CONFIG")]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // stdout carries the protocol, so logs must go to stderr.
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ServingConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            info!("No config file given, using defaults");
            ServingConfig::default()
        }
    }
    .with_env_overrides();

    let server = RecServer::new(config).await?;
    server.run().await
}
