//! Skill Commands

use anyhow::Result;
use clap::Subcommand;
use skillswap_common::forms::SkillForm;
use skillswap_common::{Skill, SkillId, SkillLevel, SkillType, SkillUpdate};

use super::Ctx;

#[derive(Subcommand, Debug)]
pub enum SkillsCommand {
    /// List your skills, offered and wanted
    List,
    /// Add a skill
    Add {
        name: String,
        /// offered or wanted
        #[arg(long = "type", default_value = "offered")]
        skill_type: SkillType,
        /// Beginner, Intermediate, or Pro
        #[arg(long, default_value = "Intermediate")]
        level: SkillLevel,
        #[arg(long)]
        description: Option<String>,
    },
    /// Change a skill; only the given fields are updated
    Edit {
        id: SkillId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        skill_type: Option<SkillType>,
        #[arg(long)]
        level: Option<SkillLevel>,
        /// Pass an empty string to clear
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove a skill
    Delete { id: SkillId },
}

fn print_skill(skill: &Skill) {
    print!("  #{:<4} {} [{}]", skill.id, skill.name, skill.level);
    if let Some(description) = &skill.description {
        print!(" - {description}");
    }
    println!();
}

pub async fn run(ctx: &Ctx, cmd: SkillsCommand) -> Result<()> {
    let registry = &ctx.client.skills;
    match cmd {
        SkillsCommand::List => {
            let result = registry.refresh().await;
            ctx.render(result, |skills| {
                let (offered, wanted): (Vec<&Skill>, Vec<&Skill>) =
                    skills.iter().partition(|s| s.is_offered());
                println!("Offered ({})", offered.len());
                offered.into_iter().for_each(print_skill);
                println!("Wanted ({})", wanted.len());
                wanted.into_iter().for_each(print_skill);
            })
        }
        SkillsCommand::Add {
            name,
            skill_type,
            level,
            description,
        } => {
            let mut form = SkillForm::new(name, skill_type, level);
            form.description = description;
            let result = registry.create(&form).await;
            ctx.render(result, |skill| println!("Added {} skill #{}", skill.skill_type, skill.id))
        }
        SkillsCommand::Edit {
            id,
            name,
            skill_type,
            level,
            description,
        } => {
            let update = SkillUpdate {
                name,
                skill_type,
                level,
                description,
            };
            // The shadow needs the current listing before an optimistic edit.
            let result = match registry.refresh().await {
                Ok(_) => registry.edit(id, update).await,
                Err(e) => Err(e),
            };
            ctx.render(result, print_skill)
        }
        SkillsCommand::Delete { id } => {
            let result = match registry.refresh().await {
                Ok(_) => registry.delete(id).await,
                Err(e) => Err(e),
            };
            ctx.render(result, |_| println!("Deleted skill #{id}"))
        }
    }
}
