//! Account Commands

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use skillswap_client::PhotoUpload;
use skillswap_common::forms::{LoginForm, RegisterForm};
use skillswap_common::validation::password_strength;
use skillswap_common::User;

use super::Ctx;

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "SKILLSWAP_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "SKILLSWAP_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Defaults to --password
    #[arg(long)]
    pub confirm_password: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    /// Free text, e.g. "weekends"
    #[arg(long)]
    pub availability: Option<String>,
    /// Profile photo (JPG, PNG, GIF, or WebP, up to 5MB)
    #[arg(long)]
    pub photo: Option<PathBuf>,
    /// Hide the profile from the public directory
    #[arg(long)]
    pub private: bool,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Show or hide your profile in the directory
    Visibility {
        #[arg(long, conflicts_with = "private", required_unless_present = "private")]
        public: bool,
        #[arg(long)]
        private: bool,
    },
    /// Set when you are available
    Availability { text: String },
    /// Upload a new profile photo
    Photo { path: PathBuf },
}

fn print_user(user: &User) {
    println!("{} <{}> (id {})", user.name, user.email, user.id);
    if let Some(location) = &user.location {
        println!("  location:     {location}");
    }
    if let Some(availability) = &user.availability {
        println!("  availability: {availability}");
    }
    println!(
        "  profile:      {}",
        if user.is_public { "public" } else { "private" }
    );
    if user.is_admin {
        println!("  role:         admin");
    }
}

pub async fn login(ctx: &Ctx, args: LoginArgs) -> Result<()> {
    let form = LoginForm::new(args.email, args.password);
    let result = ctx.client.session.login(&form).await;
    ctx.render(result, |user| println!("Logged in as {} ({})", user.name, user.email))
}

pub async fn register(ctx: &Ctx, args: RegisterArgs) -> Result<()> {
    let photo = match &args.photo {
        Some(path) => Some(PhotoUpload::from_path(path).await?),
        None => None,
    };
    let strength = password_strength(&args.password);
    let form = RegisterForm {
        name: args.name,
        email: args.email,
        confirm_password: args.confirm_password.unwrap_or_else(|| args.password.clone()),
        password: args.password,
        location: args.location,
        availability: args.availability,
        photo: None,
        is_public: !args.private,
    };

    let result = ctx.client.session.register(&form, photo.as_ref()).await;
    ctx.render(result, |user| {
        println!("Welcome, {}! Password strength: {}", user.name, strength.label());
    })
}

pub async fn logout(ctx: &Ctx) -> Result<()> {
    ctx.client.logout().await;
    ctx.render(Ok(()), |_| println!("Logged out"))
}

pub async fn whoami(ctx: &Ctx) -> Result<()> {
    let session = &ctx.client.session;
    let result = match session.require_user() {
        Ok(user) => session.stats().await.map(|stats| (user, stats)),
        Err(e) => Err(e),
    };
    ctx.render(result, |(user, stats)| {
        print_user(user);
        println!(
            "  swaps:        {} total, {} completed",
            stats.total_swaps, stats.completed_swaps
        );
        println!(
            "  rating:       {:.1} from {} ratings",
            stats.average_rating, stats.total_ratings
        );
    })
}

pub async fn profile(ctx: &Ctx, cmd: ProfileCommand) -> Result<()> {
    let session = &ctx.client.session;
    match cmd {
        ProfileCommand::Visibility { public, .. } => {
            let result = session.update_visibility(public).await;
            ctx.render(result, print_user)
        }
        ProfileCommand::Availability { text } => {
            let result = session.update_availability(&text).await;
            ctx.render(result, print_user)
        }
        ProfileCommand::Photo { path } => {
            let photo = PhotoUpload::from_path(&path).await?;
            let result = session.upload_photo(&photo).await;
            ctx.render(result, |stored| println!("Photo uploaded: {stored}"))
        }
    }
}
