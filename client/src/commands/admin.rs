//! Admin Commands

use std::path::PathBuf;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Args, Subcommand};
use skillswap_client::AdminConsole;
use skillswap_common::{
    ListQuery, MessageType, Report, ReportFormat, ReportRequest, ReportType, SkillId, UserId,
};

use super::Ctx;

#[derive(Args, Debug, Default)]
pub struct PageArgs {
    #[arg(long, default_value_t = 0)]
    pub skip: u32,
    #[arg(long, default_value_t = 0)]
    pub limit: u32,
    /// Filter by status (listing specific)
    #[arg(long)]
    pub status: Option<String>,
}

impl From<PageArgs> for ListQuery {
    fn from(args: PageArgs) -> Self {
        Self {
            skip: args.skip,
            limit: args.limit,
            status: args.status,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Platform overview
    Dashboard,
    /// Platform counters
    Stats,
    /// List users
    Users(PageArgs),
    /// List skills awaiting or past moderation
    Skills(PageArgs),
    /// List swaps
    Swaps(PageArgs),
    /// Ban a user
    Ban {
        user_id: UserId,
        #[arg(long)]
        reason: String,
    },
    /// Lift a ban
    Unban { user_id: UserId },
    /// Approve a skill listing
    Approve { skill_id: SkillId },
    /// Reject a skill listing
    Reject {
        skill_id: SkillId,
        #[arg(long)]
        reason: String,
    },
    /// List platform messages
    Messages(PageArgs),
    /// Send a platform message to every user
    Broadcast {
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
        /// info, warning, error, or success
        #[arg(long = "type", default_value = "info")]
        message_type: MessageType,
    },
    /// Delete a platform message
    DeleteMessage { id: i64 },
    /// Generate a report
    Report {
        /// users, swaps, skills, or ratings
        report_type: ReportType,
        /// json or csv
        #[arg(long, default_value = "json")]
        format: ReportFormat,
        /// First day included (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day included (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Write the report here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn start_of(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::default())
}

fn end_of(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(23, 59, 59).unwrap_or_else(|| start_of(day))
}

pub async fn run(ctx: &Ctx, cmd: AdminCommand) -> Result<()> {
    let console = &ctx.client.admin;

    match cmd {
        AdminCommand::Dashboard => {
            let result = console.dashboard().await;
            ctx.render(result, |d| {
                let s = &d.stats;
                println!(
                    "Users: {} ({} active, {} banned)",
                    s.total_users, s.active_users, s.banned_users
                );
                println!(
                    "Swaps: {} ({} pending, {} completed)",
                    s.total_swaps, s.pending_swaps, s.completed_swaps
                );
                println!("Skills: {} ({} pending review)", s.total_skills, s.pending_skills);
                println!("Ratings: {} (avg {:.1})", s.total_ratings, s.average_rating);
                println!("Skills awaiting review:");
                for skill in &d.pending_skills {
                    println!("  #{} {} by user #{}", skill.id, skill.name, skill.user_id);
                }
            })
        }
        AdminCommand::Stats => {
            let result = console.stats().await;
            ctx.render(result, |s| {
                println!("{s:#?}");
            })
        }
        AdminCommand::Users(page) => {
            let result = console.users(&page.into()).await;
            ctx.render(result, |users| {
                for u in users {
                    println!(
                        "#{} {} <{}>{}{}",
                        u.id,
                        u.name,
                        u.email,
                        if u.is_admin { " [admin]" } else { "" },
                        if u.is_banned { " [banned]" } else { "" }
                    );
                }
            })
        }
        AdminCommand::Skills(page) => {
            let result = console.skills(&page.into()).await;
            ctx.render(result, |skills| {
                for s in skills {
                    println!(
                        "#{} {} ({}, {}) by #{} [{}]",
                        s.id, s.name, s.skill_type, s.level, s.user_id, s.status
                    );
                }
            })
        }
        AdminCommand::Swaps(page) => {
            let result = console.swaps(&page.into()).await;
            ctx.render(result, |swaps| {
                for s in swaps {
                    println!(
                        "#{} user #{} -> user #{} [{}]",
                        s.id, s.from_user_id, s.to_user_id, s.status
                    );
                }
            })
        }
        AdminCommand::Ban { user_id, reason } => {
            let result = console.ban_user(user_id, &reason).await;
            ctx.render(result, |_| println!("User #{user_id} banned"))
        }
        AdminCommand::Unban { user_id } => {
            let result = console.unban_user(user_id).await;
            ctx.render(result, |_| println!("User #{user_id} unbanned"))
        }
        AdminCommand::Approve { skill_id } => {
            let result = console.approve_skill(skill_id).await;
            ctx.render(result, |_| println!("Skill #{skill_id} approved"))
        }
        AdminCommand::Reject { skill_id, reason } => {
            let result = console.reject_skill(skill_id, &reason).await;
            ctx.render(result, |_| println!("Skill #{skill_id} rejected"))
        }
        AdminCommand::Messages(page) => {
            let result = console.messages(&page.into()).await;
            ctx.render(result, |messages| {
                for m in messages {
                    println!(
                        "#{} [{}]{} {}: {}",
                        m.id,
                        m.message_type,
                        if m.is_active { "" } else { " (inactive)" },
                        m.title,
                        m.message
                    );
                }
            })
        }
        AdminCommand::Broadcast {
            title,
            message,
            message_type,
        } => {
            let result = console.broadcast(&title, &message, message_type).await;
            ctx.render(result, |m| println!("Message #{} sent", m.id))
        }
        AdminCommand::DeleteMessage { id } => {
            let result = console.delete_message(id).await;
            ctx.render(result, |_| println!("Message #{id} deleted"))
        }
        AdminCommand::Report {
            report_type,
            format,
            from,
            to,
            output,
        } => {
            let request = ReportRequest {
                report_type,
                start_date: from.map(start_of),
                end_date: to.map(end_of),
                format,
            };
            let report = match console.report(&request).await {
                Ok(report) => report,
                Err(e) => return ctx.render(Err::<(), _>(e), |_| {}),
            };

            if let Some(path) = output {
                let saved = AdminConsole::save_report(&report, &path).await;
                return ctx.render(saved, |_| println!("Report written to {}", path.display()));
            }
            match report {
                Report::Csv(text) => print!("{text}"),
                Report::Json(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            }
            Ok(())
        }
    }
}
