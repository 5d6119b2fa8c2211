//! Admin endpoints (`/admin/*`).
//!
//! The server checks privileges on every call; callers gate locally as well.

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use skillswap_common::{
    Acknowledgement, AdminDashboard, AdminPage, AdminSkill, AdminStats, AdminSwap, AdminUser,
    ApproveSkillRequest, BanUserRequest, ListQuery, NewPlatformMessage, PlatformMessage,
    RejectSkillRequest, Report, ReportFormat, ReportRequest, SkillId, UnbanUserRequest, UserId,
};
use tracing::error;

use super::ApiClient;
use crate::error::{ClientError, ClientResult};

impl ApiClient {
    // ========================================================================
    // Overview
    // ========================================================================

    /// `GET /admin/dashboard`.
    pub async fn admin_dashboard(&self) -> ClientResult<AdminDashboard> {
        self.get("/admin/dashboard").await
    }

    /// `GET /admin/stats`.
    pub async fn admin_stats(&self) -> ClientResult<AdminStats> {
        self.get("/admin/stats").await
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// `GET /admin/users`.
    pub async fn admin_users(&self, query: &ListQuery) -> ClientResult<Vec<AdminUser>> {
        let page: AdminPage<AdminUser> = self
            .get_with_query("/admin/users", &query.to_pairs())
            .await?;
        Ok(page.into_items())
    }

    /// `GET /admin/skills`.
    pub async fn admin_skills(&self, query: &ListQuery) -> ClientResult<Vec<AdminSkill>> {
        let page: AdminPage<AdminSkill> = self
            .get_with_query("/admin/skills", &query.to_pairs())
            .await?;
        Ok(page.into_items())
    }

    /// `GET /admin/swaps`.
    pub async fn admin_swaps(&self, query: &ListQuery) -> ClientResult<Vec<AdminSwap>> {
        let page: AdminPage<AdminSwap> = self
            .get_with_query("/admin/swaps", &query.to_pairs())
            .await?;
        Ok(page.into_items())
    }

    // ========================================================================
    // Moderation
    // ========================================================================

    /// `POST /admin/users/ban`.
    pub async fn ban_user(&self, user_id: UserId, reason: &str) -> ClientResult<Acknowledgement> {
        let body = BanUserRequest {
            user_id,
            reason: reason.to_string(),
        };
        self.post("/admin/users/ban", &body).await
    }

    /// `POST /admin/users/unban`.
    pub async fn unban_user(&self, user_id: UserId) -> ClientResult<Acknowledgement> {
        self.post("/admin/users/unban", &UnbanUserRequest { user_id })
            .await
    }

    /// `POST /admin/skills/approve`.
    pub async fn approve_skill(&self, skill_id: SkillId) -> ClientResult<Acknowledgement> {
        self.post("/admin/skills/approve", &ApproveSkillRequest { skill_id })
            .await
    }

    /// `POST /admin/skills/reject`.
    pub async fn reject_skill(&self, skill_id: SkillId, reason: &str) -> ClientResult<Acknowledgement> {
        let body = RejectSkillRequest {
            skill_id,
            reason: reason.to_string(),
        };
        self.post("/admin/skills/reject", &body).await
    }

    // ========================================================================
    // Platform messages
    // ========================================================================

    /// `GET /admin/messages`.
    pub async fn platform_messages(&self, query: &ListQuery) -> ClientResult<Vec<PlatformMessage>> {
        let page: AdminPage<PlatformMessage> = self
            .get_with_query("/admin/messages", &query.to_pairs())
            .await?;
        Ok(page.into_items())
    }

    /// `POST /admin/messages`.
    pub async fn create_platform_message(
        &self,
        message: &NewPlatformMessage,
    ) -> ClientResult<PlatformMessage> {
        self.post("/admin/messages", message).await
    }

    /// `DELETE /admin/messages/{id}`.
    pub async fn delete_platform_message(&self, id: i64) -> ClientResult<Option<Acknowledgement>> {
        self.delete(&format!("/admin/messages/{id}")).await
    }

    // ========================================================================
    // Reports
    // ========================================================================

    /// `POST /admin/reports`.
    ///
    /// CSV reports come back as text; a CSV request answered with JSON is
    /// treated as structured rows.
    pub async fn generate_report(&self, request: &ReportRequest) -> ClientResult<Report> {
        let path = "/admin/reports";
        let builder = self.builder(Method::POST, path).await.json(request);
        let response = self.execute(builder, path).await?;

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("json"));
        let raw = response.text().await.map_err(|e| {
            error!("Failed to read report body: {}", e);
            ClientError::network(&e)
        })?;

        if request.format == ReportFormat::Csv && !is_json {
            return Ok(Report::Csv(raw));
        }
        let value = super::decode(&raw, path)?;
        Ok(Report::Json(value))
    }
}
