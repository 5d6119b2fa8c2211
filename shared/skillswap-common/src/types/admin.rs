//! Admin Types
//!
//! Payloads of the `/admin/*` namespace: moderation listings, platform
//! messages, statistics, and reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ModerationStatus, SkillId, SkillLevel, SkillType, SwapId, SwapStatus, UserId};
use crate::Error;

// ============================================================================
// Listings
// ============================================================================

/// User row in the admin user listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub total_swaps: i64,
    #[serde(default)]
    pub total_skills: i64,
    #[serde(default)]
    pub average_rating: f64,
}

/// Skill row in the moderation queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSkill {
    pub id: SkillId,
    pub name: String,
    #[serde(rename = "type")]
    pub skill_type: SkillType,
    pub level: SkillLevel,
    pub user_id: UserId,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub status: ModerationStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Swap row in the admin swap listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSwap {
    pub id: SwapId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub skill_offered_id: SkillId,
    pub skill_requested_id: SkillId,
    pub status: SwapStatus,
    #[serde(default)]
    pub from_user_name: Option<String>,
    #[serde(default)]
    pub to_user_name: Option<String>,
    #[serde(default)]
    pub skill_offered_name: Option<String>,
    #[serde(default)]
    pub skill_requested_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A listing page. Some server builds return a bare array, others a wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdminPage<T> {
    Paginated {
        items: Vec<T>,
        #[serde(default)]
        total: Option<i64>,
    },
    List(Vec<T>),
}

impl<T> AdminPage<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paginated { items, .. } | Self::List(items) => items,
        }
    }
}

/// Listing filters. Zero/unset values are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub skip: u32,
    pub limit: u32,
    pub status: Option<String>,
}

impl ListQuery {
    /// Query pairs, omitting anything unset.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.skip > 0 {
            pairs.push(("skip", self.skip.to_string()));
        }
        if self.limit > 0 {
            pairs.push(("limit", self.limit.to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("status", status.to_string()));
        }
        pairs
    }
}

// ============================================================================
// Moderation requests
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanUserRequest {
    pub user_id: UserId,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbanUserRequest {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveSkillRequest {
    pub skill_id: SkillId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectSkillRequest {
    pub skill_id: SkillId,
    pub reason: String,
}

// ============================================================================
// Platform messages
// ============================================================================

/// Severity of a broadcast message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Info,
    Warning,
    Error,
    Success,
}

impl MessageType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "success" => Ok(Self::Success),
            _ => Err(Error::InvalidValue {
                kind: "message type",
                value: s.to_string(),
            }),
        }
    }
}

/// The backend stores `is_active` in a string column, so accept bools and strings.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
        Number(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => matches!(s.to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        Flag::Number(n) => n != 0,
    })
}

const fn default_active() -> bool {
    true
}

/// Broadcast message shown to every user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformMessage {
    pub id: i64,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub message_type: MessageType,
    #[serde(default = "default_active", deserialize_with = "deserialize_flag")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<UserId>,
}

/// Body of `POST /admin/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlatformMessage {
    pub title: String,
    pub message: String,
    pub message_type: MessageType,
}

// ============================================================================
// Statistics and reports
// ============================================================================

/// Platform-wide counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminStats {
    pub total_users: i64,
    pub active_users: i64,
    pub banned_users: i64,
    pub total_swaps: i64,
    pub pending_swaps: i64,
    pub completed_swaps: i64,
    pub total_skills: i64,
    pub pending_skills: i64,
    pub total_ratings: i64,
    pub average_rating: f64,
}

/// `GET /admin/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminDashboard {
    pub stats: AdminStats,
    pub recent_users: Vec<AdminUser>,
    pub recent_swaps: Vec<AdminSwap>,
    pub pending_skills: Vec<AdminSkill>,
}

/// What a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Users,
    Swaps,
    Skills,
    Ratings,
}

impl FromStr for ReportType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "users" => Ok(Self::Users),
            "swaps" => Ok(Self::Swaps),
            "skills" => Ok(Self::Skills),
            "ratings" => Ok(Self::Ratings),
            _ => Err(Error::InvalidValue {
                kind: "report type",
                value: s.to_string(),
            }),
        }
    }
}

/// Report encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(Error::InvalidValue {
                kind: "report format",
                value: s.to_string(),
            }),
        }
    }
}

/// Body of `POST /admin/reports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub report_type: ReportType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<chrono::NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<chrono::NaiveDateTime>,
    pub format: ReportFormat,
}

/// A generated report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Structured rows.
    Json(serde_json::Value),
    /// CSV text, ready to be written to a file.
    Csv(String),
}
