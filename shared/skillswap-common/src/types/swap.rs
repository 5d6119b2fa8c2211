//! Swap Types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{SkillId, SwapId, UserId};
use crate::lifecycle::SwapRole;
use crate::Error;

/// Status of a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    /// Waiting for the recipient to answer.
    Pending,
    /// Recipient agreed; the exchange is in progress.
    Accepted,
    /// Recipient declined.
    Rejected,
    /// Requester withdrew while pending.
    Cancelled,
    /// Exchange finished; both parties may rate.
    Completed,
}

impl SwapStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Accepted,
        Self::Rejected,
        Self::Cancelled,
        Self::Completed,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// No transition leaves a terminal status.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled | Self::Completed)
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwapStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidValue {
                kind: "swap status",
                value: s.to_string(),
            })
    }
}

/// A proposed exchange of one user's offered skill for another user's offered skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swap {
    pub id: SwapId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub skill_offered_id: SkillId,
    pub skill_requested_id: SkillId,
    pub status: SwapStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_offered_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_requested_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Swap {
    /// Role of `user_id` in this swap, or `None` for outsiders.
    pub fn role_of(&self, user_id: UserId) -> Option<SwapRole> {
        if user_id == self.from_user_id {
            Some(SwapRole::Requester)
        } else if user_id == self.to_user_id {
            Some(SwapRole::Recipient)
        } else {
            None
        }
    }

    /// The other party, seen from `user_id`.
    pub fn counterpart(&self, user_id: UserId) -> Result<UserId, Error> {
        match self.role_of(user_id) {
            Some(SwapRole::Requester) => Ok(self.to_user_id),
            Some(SwapRole::Recipient) => Ok(self.from_user_id),
            None => Err(Error::NotParticipant {
                swap_id: self.id,
                user_id,
            }),
        }
    }

    /// Counterpart's display name, when the server included one.
    pub fn counterpart_name(&self, user_id: UserId) -> Option<&str> {
        match self.role_of(user_id)? {
            SwapRole::Requester => self.to_user_name.as_deref(),
            SwapRole::Recipient => self.from_user_name.as_deref(),
        }
    }
}

/// Body of `POST /swaps`. The requester is implied by the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSwap {
    pub to_user_id: UserId,
    pub skill_offered_id: SkillId,
    pub skill_requested_id: SkillId,
}
