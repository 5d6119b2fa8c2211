//! Admin Console
//!
//! Moderation, broadcasts, statistics, and reports. Every call first checks
//! that the logged-in user is an administrator.

use std::path::Path;
use std::sync::Arc;

use skillswap_common::{
    AdminDashboard, AdminSkill, AdminStats, AdminSwap, AdminUser, ListQuery, MessageType,
    NewPlatformMessage, PlatformMessage, Report, ReportRequest, SkillId, UserId,
};
use tracing::{info, warn};

use crate::error::{ClientError, ClientResult};
use crate::session::Session;

#[derive(Debug)]
pub struct AdminConsole {
    session: Arc<Session>,
}

fn required(field: &str, value: &str, message: &str) -> ClientResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::invalid_field(field, message));
    }
    Ok(trimmed.to_string())
}

impl AdminConsole {
    pub const fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    fn guard(&self) -> ClientResult<()> {
        self.session.require_admin().map(|_| ()).inspect_err(|e| {
            warn!("Admin operation refused locally: {}", e);
        })
    }

    // ========================================================================
    // Overview
    // ========================================================================

    pub async fn dashboard(&self) -> ClientResult<AdminDashboard> {
        self.guard()?;
        self.session.api().admin_dashboard().await
    }

    pub async fn stats(&self) -> ClientResult<AdminStats> {
        self.guard()?;
        self.session.api().admin_stats().await
    }

    pub async fn users(&self, query: &ListQuery) -> ClientResult<Vec<AdminUser>> {
        self.guard()?;
        self.session.api().admin_users(query).await
    }

    pub async fn skills(&self, query: &ListQuery) -> ClientResult<Vec<AdminSkill>> {
        self.guard()?;
        self.session.api().admin_skills(query).await
    }

    pub async fn swaps(&self, query: &ListQuery) -> ClientResult<Vec<AdminSwap>> {
        self.guard()?;
        self.session.api().admin_swaps(query).await
    }

    // ========================================================================
    // Moderation
    // ========================================================================

    pub async fn ban_user(&self, user_id: UserId, reason: &str) -> ClientResult<()> {
        self.guard()?;
        let reason = required("reason", reason, "A reason is required")?;
        self.session.api().ban_user(user_id, &reason).await?;
        info!(user_id, "User banned: {}", reason);
        Ok(())
    }

    pub async fn unban_user(&self, user_id: UserId) -> ClientResult<()> {
        self.guard()?;
        self.session.api().unban_user(user_id).await?;
        info!(user_id, "User unbanned");
        Ok(())
    }

    pub async fn approve_skill(&self, skill_id: SkillId) -> ClientResult<()> {
        self.guard()?;
        self.session.api().approve_skill(skill_id).await?;
        info!(skill_id, "Skill approved");
        Ok(())
    }

    pub async fn reject_skill(&self, skill_id: SkillId, reason: &str) -> ClientResult<()> {
        self.guard()?;
        let reason = required("reason", reason, "A reason is required")?;
        self.session.api().reject_skill(skill_id, &reason).await?;
        info!(skill_id, "Skill rejected: {}", reason);
        Ok(())
    }

    // ========================================================================
    // Platform messages
    // ========================================================================

    pub async fn messages(&self, query: &ListQuery) -> ClientResult<Vec<PlatformMessage>> {
        self.guard()?;
        self.session.api().platform_messages(query).await
    }

    pub async fn broadcast(
        &self,
        title: &str,
        message: &str,
        message_type: MessageType,
    ) -> ClientResult<PlatformMessage> {
        self.guard()?;
        let body = NewPlatformMessage {
            title: required("title", title, "Title is required")?,
            message: required("message", message, "Message is required")?,
            message_type,
        };
        let created = self.session.api().create_platform_message(&body).await?;
        info!(message_id = created.id, "Platform message sent: {}", created.title);
        Ok(created)
    }

    pub async fn delete_message(&self, id: i64) -> ClientResult<()> {
        self.guard()?;
        self.session.api().delete_platform_message(id).await?;
        info!(message_id = id, "Platform message deleted");
        Ok(())
    }

    // ========================================================================
    // Reports
    // ========================================================================

    pub async fn report(&self, request: &ReportRequest) -> ClientResult<Report> {
        self.guard()?;
        if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
            if start > end {
                return Err(ClientError::invalid_field(
                    "end_date",
                    "End date must be after start date",
                ));
            }
        }
        self.session.api().generate_report(request).await
    }

    /// Write a report to `path`; JSON is pretty-printed.
    pub async fn save_report(report: &Report, path: &Path) -> ClientResult<()> {
        let body = match report {
            Report::Csv(text) => text.clone(),
            Report::Json(value) => serde_json::to_string_pretty(value)
                .map_err(|e| ClientError::Decode(e.to_string()))?,
        };
        tokio::fs::write(path, body).await?;
        info!(path = %path.display(), "Report saved");
        Ok(())
    }
}
