//! `SkillSwap` command-line front end.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use skillswap_client::{Client, ClientConfig};
use tracing::{debug, warn};

use commands::{Command, Ctx};

/// Trade skills with people near you
#[derive(Parser, Debug)]
#[command(name = "skillswap")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Marketplace service URL (overrides SKILLSWAP_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Where the session token is kept (overrides SKILLSWAP_SESSION_FILE)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// Print responses as `{ data, error, message }` JSON
    #[arg(long, global = true)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skillswap_client=info,skillswap=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    if let Some(session_file) = args.session_file {
        config.session_file = Some(session_file);
    }
    debug!(api_url = %config.api_url, "Configuration loaded");

    let client = Client::new(&config).context("Failed to set up the API client")?;

    if let Err(e) = client.session.restore().await {
        warn!("Could not restore the previous session: {}", e);
    }

    let ctx = Ctx {
        client,
        config,
        json: args.json,
    };
    commands::dispatch(&ctx, args.command).await
}
