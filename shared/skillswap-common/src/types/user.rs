//! User Types

use serde::{Deserialize, Serialize};

use super::{Skill, UserId};

const fn default_true() -> bool {
    true
}

/// Full user record, as returned by `/me` and `/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address (unique, lowercase).
    pub email: String,
    /// Free-text location.
    #[serde(default)]
    pub location: Option<String>,
    /// Server-relative path of the uploaded profile photo.
    #[serde(default)]
    pub photo_path: Option<String>,
    /// Free-text availability ("weekends", "evenings", ...).
    #[serde(default)]
    pub availability: Option<String>,
    /// Whether the profile is listed in the public directory.
    #[serde(default = "default_true")]
    pub is_public: bool,
    /// Whether the user may use the admin console.
    #[serde(default)]
    pub is_admin: bool,
    /// Whether an administrator banned the account.
    #[serde(default)]
    pub is_banned: bool,
    /// When the user registered.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last successful login.
    #[serde(default)]
    pub last_login: Option<String>,
}

/// Aggregate statistics from `/me/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub total_swaps: i64,
    pub completed_swaps: i64,
    pub average_rating: f64,
    pub total_ratings: i64,
}

/// Member entry in the public directory (`/public-users`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub photo_path: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub average_rating: Option<f64>,
}

impl PublicUser {
    /// Skills this member offers.
    pub fn offered_skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter().filter(|s| s.is_offered())
    }

    /// Skills this member wants to learn.
    pub fn wanted_skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter().filter(|s| !s.is_offered())
    }
}

/// Registration payload for `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    pub is_public: bool,
}

/// Credentials for `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token returned by `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Response of `POST /upload-photo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoUploadResponse {
    pub photo_path: String,
}
