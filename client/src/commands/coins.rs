//! Coin Commands

use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Args;
use skillswap_client::LedgerState;
use tokio::signal;

use super::Ctx;

#[derive(Args, Debug)]
pub struct CoinsArgs {
    /// Claim the completed-swap bonus before showing the balance
    #[arg(long)]
    pub claim_bonus: bool,
    /// Keep running and print the balance whenever it changes
    #[arg(long)]
    pub watch: bool,
    /// Seconds between balance checks while watching
    #[arg(long)]
    pub interval: Option<u64>,
}

fn describe(state: &LedgerState) -> String {
    match state {
        LedgerState::Idle => "Log in to see your coins".to_string(),
        LedgerState::Loading => "Loading coins...".to_string(),
        LedgerState::Loaded(coins) => format!("{coins} coins"),
        LedgerState::Failed(message) => message.clone(),
    }
}

pub async fn run(ctx: &Ctx, args: CoinsArgs) -> Result<()> {
    let ledger = &ctx.client.coins;

    if args.claim_bonus {
        let session = &ctx.client.session;
        let result = match session.require_user() {
            Ok(_) => session.api().check_swap_bonus().await,
            Err(e) => Err(e),
        };
        ctx.render(result, |bonus| {
            println!(
                "Bonus awarded: {} coins ({} completed swaps)",
                bonus.bonus_awarded, bonus.completed_swaps
            );
        })?;
    }

    if !args.watch {
        return match ledger.refresh().await {
            LedgerState::Loaded(coins) => ctx.render(Ok(coins), |c| println!("{c} coins")),
            other => Err(anyhow!(describe(&other))),
        };
    }

    let mut updates = ledger.subscribe();
    let poll = args
        .interval
        .map_or(ctx.config.coin_poll_interval, Duration::from_secs);
    let watcher = ledger.spawn_watcher(poll);
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if state != LedgerState::Loading {
                    println!("{}", describe(&state));
                }
            }
            _ = signal::ctrl_c() => break,
        }
    }
    watcher.abort();
    Ok(())
}
