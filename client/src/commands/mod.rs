//! CLI Commands
//!
//! One subcommand per user action. Handlers print plain text, or the
//! `{ data, error, message }` envelope as JSON with `--json`.

pub mod account;
pub mod admin;
pub mod browse;
pub mod coins;
pub mod skills;
pub mod swaps;

use anyhow::{anyhow, Result};
use clap::Subcommand;
use serde::Serialize;
use skillswap_client::error::envelope;
use skillswap_client::{Client, ClientConfig, ClientResult};

/// Shared state of one CLI invocation.
pub struct Ctx {
    pub client: Client,
    pub config: ClientConfig,
    pub json: bool,
}

impl Ctx {
    /// Print `result` as text via `text`, or as an envelope in JSON mode.
    pub fn render<T, F>(&self, result: ClientResult<T>, text: F) -> Result<()>
    where
        T: Serialize,
        F: FnOnce(&T),
    {
        if self.json {
            let failure = result.as_ref().err().map(|e| e.user_message());
            let body = envelope(result);
            println!("{}", serde_json::to_string_pretty(&body)?);
            return match failure {
                Some(message) => Err(anyhow!(message)),
                None => Ok(()),
            };
        }

        let data = result.map_err(|e| anyhow!(e.user_message()))?;
        text(&data);
        Ok(())
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in with email and password
    Login(account::LoginArgs),
    /// Create an account and log in
    Register(account::RegisterArgs),
    /// Forget the stored session
    Logout,
    /// Show the logged-in user and their stats
    Whoami,
    /// Change profile settings
    #[command(subcommand)]
    Profile(account::ProfileCommand),
    /// Manage your offered and wanted skills
    #[command(subcommand)]
    Skills(skills::SkillsCommand),
    /// Browse public members
    Browse(browse::BrowseArgs),
    /// Rank offered skills against a search phrase
    Match(browse::MatchArgs),
    /// Request and answer skill swaps
    #[command(subcommand)]
    Swaps(swaps::SwapsCommand),
    /// Rate the other party of a completed swap
    Rate(swaps::RateArgs),
    /// Coin balance
    Coins(coins::CoinsArgs),
    /// Administration
    #[command(subcommand)]
    Admin(admin::AdminCommand),
}

pub async fn dispatch(ctx: &Ctx, command: Command) -> Result<()> {
    match command {
        Command::Login(args) => account::login(ctx, args).await,
        Command::Register(args) => account::register(ctx, args).await,
        Command::Logout => account::logout(ctx).await,
        Command::Whoami => account::whoami(ctx).await,
        Command::Profile(cmd) => account::profile(ctx, cmd).await,
        Command::Skills(cmd) => skills::run(ctx, cmd).await,
        Command::Browse(args) => browse::browse(ctx, args).await,
        Command::Match(args) => browse::suggest(ctx, args).await,
        Command::Swaps(cmd) => swaps::run(ctx, cmd).await,
        Command::Rate(args) => swaps::rate(ctx, args).await,
        Command::Coins(args) => coins::run(ctx, args).await,
        Command::Admin(cmd) => admin::run(ctx, cmd).await,
    }
}
