//! Swap Commands

use anyhow::Result;
use clap::{Args, Subcommand};
use skillswap_client::swaps::{eligible_offers, eligible_requests};
use skillswap_client::{ClientError, ClientResult};
use skillswap_common::{Rating, Skill, SkillId, Swap, SwapId, UserId};

use super::Ctx;

#[derive(Subcommand, Debug)]
pub enum SwapsCommand {
    /// Show swaps grouped into current, pending, and history
    List,
    /// Show the skills you could trade with a member
    Options { user_id: UserId },
    /// Ask a member for one of their skills in exchange for one of yours
    Request {
        #[arg(long)]
        to: UserId,
        /// Your offered skill
        #[arg(long)]
        offer: SkillId,
        /// Their offered skill
        #[arg(long)]
        want: SkillId,
    },
    /// Accept a request you received
    Accept { id: SwapId },
    /// Decline a request you received
    Reject { id: SwapId },
    /// Mark an accepted swap as done
    Complete { id: SwapId },
    /// Withdraw a request you sent
    Cancel { id: SwapId },
    /// List the ratings left on a swap
    Ratings { id: SwapId },
}

#[derive(Args, Debug)]
pub struct RateArgs {
    pub swap_id: SwapId,
    /// 1 to 5
    #[arg(long)]
    pub stars: u8,
    #[arg(long)]
    pub feedback: Option<String>,
}

fn describe(swap: &Swap, viewer: Option<UserId>) -> String {
    let offered = swap
        .skill_offered_name
        .clone()
        .unwrap_or_else(|| format!("skill #{}", swap.skill_offered_id));
    let requested = swap
        .skill_requested_name
        .clone()
        .unwrap_or_else(|| format!("skill #{}", swap.skill_requested_id));
    let with = viewer
        .and_then(|v| swap.counterpart_name(v).map(ToString::to_string))
        .unwrap_or_else(|| format!("users #{} / #{}", swap.from_user_id, swap.to_user_id));
    format!("#{} {offered} <-> {requested} with {with} [{}]", swap.id, swap.status)
}

fn print_section(ctx: &Ctx, title: &str, swaps: &[Swap], viewer: Option<UserId>) {
    println!("{title} ({})", swaps.len());
    for swap in swaps {
        let actions: Vec<&str> = ctx
            .client
            .swaps
            .available_actions(swap)
            .iter()
            .map(|a| a.as_str())
            .collect();
        if actions.is_empty() {
            println!("  {}", describe(swap, viewer));
        } else {
            println!("  {}  -> {}", describe(swap, viewer), actions.join(", "));
        }
    }
}

pub async fn run(ctx: &Ctx, cmd: SwapsCommand) -> Result<()> {
    let manager = &ctx.client.swaps;
    let viewer = ctx.client.session.current_user().map(|u| u.id);

    match cmd {
        SwapsCommand::List => {
            let result = manager.refresh().await;
            let tabs = manager.tabs().await;
            ctx.render(result, |_| {
                print_section(ctx, "Current", &tabs.current, viewer);
                print_section(ctx, "Pending", &tabs.pending, viewer);
                print_section(ctx, "History", &tabs.history, viewer);
            })
        }
        SwapsCommand::Options { user_id } => {
            let result = trade_options(ctx, user_id).await;
            ctx.render(result, |(offers, requests)| {
                println!("You can offer:");
                for s in offers {
                    println!("  #{} {}", s.id, s.name);
                }
                println!("You can ask for:");
                for s in requests {
                    println!("  #{} {}", s.id, s.name);
                }
            })
        }
        SwapsCommand::Request { to, offer, want } => {
            let result = manager.request(to, offer, want).await;
            ctx.render(result, |swap| println!("Requested {}", describe(swap, viewer)))
        }
        SwapsCommand::Accept { id } => {
            let result = manager.accept(id).await;
            ctx.render(result, |swap| println!("Accepted {}", describe(swap, viewer)))
        }
        SwapsCommand::Reject { id } => {
            let result = manager.reject(id).await;
            ctx.render(result, |swap| println!("Rejected {}", describe(swap, viewer)))
        }
        SwapsCommand::Complete { id } => {
            let result = manager.complete(id).await;
            ctx.render(result, |swap| println!("Completed {}", describe(swap, viewer)))
        }
        SwapsCommand::Cancel { id } => {
            let result = manager.cancel(id).await;
            ctx.render(result, |_| println!("Cancelled swap #{id}"))
        }
        SwapsCommand::Ratings { id } => {
            let result = ctx.client.ratings.ratings_for(id).await;
            ctx.render(result, |ratings| {
                if ratings.is_empty() {
                    println!("No ratings yet.");
                }
                for r in ratings {
                    println!(
                        "  {}★ from #{} to #{}{}",
                        r.stars,
                        r.from_user_id,
                        r.to_user_id,
                        r.feedback
                            .as_deref()
                            .map(|f| format!(": {f}"))
                            .unwrap_or_default()
                    );
                }
            })
        }
    }
}

async fn trade_options(ctx: &Ctx, user_id: UserId) -> ClientResult<(Vec<Skill>, Vec<Skill>)> {
    let mine = ctx.client.skills.refresh().await?;
    let target = ctx
        .client
        .directory
        .members()
        .await?
        .into_iter()
        .find(|m| m.id == user_id)
        .ok_or_else(|| {
            ClientError::NotEligible(format!("Member {user_id} is not in the public directory"))
        })?;

    let offers = eligible_offers(&mine).into_iter().cloned().collect();
    let requests = eligible_requests(&target).into_iter().cloned().collect();
    Ok((offers, requests))
}

async fn submit_rating(ctx: &Ctx, args: RateArgs) -> ClientResult<Rating> {
    let swaps = &ctx.client.swaps;
    let collector = &ctx.client.ratings;

    swaps.refresh().await?;
    let swap = swaps
        .get(args.swap_id)
        .await
        .ok_or_else(|| ClientError::NotEligible(format!("Swap {} not found", args.swap_id)))?;

    let draft = collector
        .open(&swap)?
        .with_stars(args.stars)
        .with_feedback(args.feedback.unwrap_or_default());
    Ok(collector.submit(&draft).await?.rating)
}

pub async fn rate(ctx: &Ctx, args: RateArgs) -> Result<()> {
    let result = submit_rating(ctx, args).await;
    ctx.render(result, |rating| {
        println!(
            "Rated user #{} with {} stars for swap #{}",
            rating.to_user_id, rating.stars, rating.swap_id
        );
    })
}
