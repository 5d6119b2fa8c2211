//! Rating Types

use serde::{Deserialize, Serialize};

use super::{SwapId, UserId};

/// Lowest accepted star count.
pub const MIN_STARS: u8 = 1;
/// Highest accepted star count.
pub const MAX_STARS: u8 = 5;

/// Feedback one participant left for the other after a completed swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default)]
    pub id: Option<i64>,
    pub swap_id: SwapId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub stars: u8,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Body of `POST /swaps/{id}/rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRating {
    pub to_user_id: UserId,
    pub stars: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}
