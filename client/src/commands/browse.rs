//! Directory Commands

use anyhow::Result;
use clap::Args;
use skillswap_common::matching::DirectoryFilter;
use skillswap_common::SkillLevel;

use super::Ctx;

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Matches member names and skill names
    #[arg(long, short)]
    pub query: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub level: Option<SkillLevel>,
}

#[derive(Args, Debug)]
pub struct MatchArgs {
    pub query: String,
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

pub async fn browse(ctx: &Ctx, args: BrowseArgs) -> Result<()> {
    let filter = DirectoryFilter {
        query: args.query,
        location: args.location,
        level: args.level,
    };
    let result = ctx.client.directory.search(&filter).await;
    ctx.render(result, |members| {
        if members.is_empty() {
            println!("No members match.");
        }
        for member in members {
            let rating = member
                .average_rating
                .map_or_else(|| "unrated".to_string(), |r| format!("{r:.1}★"));
            println!(
                "#{} {} ({}) {}",
                member.id,
                member.name,
                member.location.as_deref().unwrap_or("-"),
                rating
            );
            let offered: Vec<&str> = member.offered_skills().map(|s| s.name.as_str()).collect();
            let wanted: Vec<&str> = member.wanted_skills().map(|s| s.name.as_str()).collect();
            println!("    offers: {}", offered.join(", "));
            println!("    wants:  {}", wanted.join(", "));
        }
    })
}

pub async fn suggest(ctx: &Ctx, args: MatchArgs) -> Result<()> {
    let result = ctx.client.directory.suggest(&args.query, args.limit).await;
    ctx.render(result, |matches| {
        if matches.is_empty() {
            println!("No offered skills match \"{}\".", args.query);
        }
        for m in matches {
            println!(
                "{:.3}  {} (skill #{}) offered by {} (#{})",
                m.score, m.skill_name, m.skill_id, m.user_name, m.user_id
            );
        }
    })
}
