//! Skill Types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{SkillId, UserId};
use crate::Error;

/// Whether a skill is offered or wanted by its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    /// The owner can teach this skill.
    Offered,
    /// The owner wants to learn this skill.
    Wanted,
}

impl SkillType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offered => "offered",
            Self::Wanted => "wanted",
        }
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offered" | "offer" => Ok(Self::Offered),
            "wanted" | "want" => Ok(Self::Wanted),
            _ => Err(Error::InvalidValue {
                kind: "skill type",
                value: s.to_string(),
            }),
        }
    }
}

/// Self-reported proficiency. Not verified by anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Pro,
}

impl SkillLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Pro => "Pro",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "pro" => Ok(Self::Pro),
            _ => Err(Error::InvalidValue {
                kind: "skill level",
                value: s.to_string(),
            }),
        }
    }
}

/// Admin moderation state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    #[default]
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(Error::InvalidValue {
                kind: "moderation status",
                value: s.to_string(),
            }),
        }
    }
}

/// A skill listing owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub user_id: UserId,
    pub name: String,
    #[serde(rename = "type")]
    pub skill_type: SkillType,
    pub level: SkillLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Absent on owner-facing endpoints; treated as approved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ModerationStatus>,
}

impl Skill {
    pub fn is_offered(&self) -> bool {
        self.skill_type == SkillType::Offered
    }

    pub fn moderation(&self) -> ModerationStatus {
        self.status.unwrap_or_default()
    }

    /// Apply an edit in place. Used for optimistic shadow updates.
    pub fn apply(&mut self, update: &SkillUpdate) {
        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(skill_type) = update.skill_type {
            self.skill_type = skill_type;
        }
        if let Some(level) = update.level {
            self.level = level;
        }
        if let Some(description) = &update.description {
            self.description = if description.is_empty() {
                None
            } else {
                Some(description.clone())
            };
        }
    }
}

/// Body of `POST /skills`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSkill {
    pub name: String,
    #[serde(rename = "type")]
    pub skill_type: SkillType,
    pub level: SkillLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `PUT /skills/{id}`. Only the set fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub skill_type: Option<SkillType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<SkillLevel>,
    /// An empty string clears the description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SkillUpdate {
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.skill_type.is_none()
            && self.level.is_none()
            && self.description.is_none()
    }
}
