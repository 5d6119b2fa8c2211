//! Swap Lifecycle
//!
//! The transition table the backend enforces, mirrored so the client can offer
//! only the actions a user may take. The client never applies a transition on
//! its own authority: it requests one and reflects whatever status comes back.
//!
//! ```text
//! pending  --accept (recipient)--> accepted --complete (either)--> completed
//!          --reject (recipient)--> rejected
//!          --cancel (requester)--> cancelled
//! ```

use std::fmt;

use crate::types::{Swap, SwapStatus, UserId};
use crate::{Error, Result};

/// Which side of a swap a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapRole {
    /// Created the request (`from_user_id`).
    Requester,
    /// Received the request (`to_user_id`).
    Recipient,
}

impl fmt::Display for SwapRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Requester => "requester",
            Self::Recipient => "recipient",
        })
    }
}

/// An action a participant can request on a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapAction {
    Accept,
    Reject,
    Cancel,
    Complete,
    /// Not a status change; opens the rating collector.
    Rate,
}

impl SwapAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
            Self::Complete => "complete",
            Self::Rate => "rate",
        }
    }

    /// Status the action leads to, if it changes status at all.
    pub const fn target_status(self) -> Option<SwapStatus> {
        match self {
            Self::Accept => Some(SwapStatus::Accepted),
            Self::Reject => Some(SwapStatus::Rejected),
            Self::Cancel => Some(SwapStatus::Cancelled),
            Self::Complete => Some(SwapStatus::Completed),
            Self::Rate => None,
        }
    }
}

impl fmt::Display for SwapAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `role` may take `action` on a swap in `status`.
pub const fn is_allowed(status: SwapStatus, action: SwapAction, role: SwapRole) -> bool {
    matches!(
        (status, action, role),
        (SwapStatus::Pending, SwapAction::Accept | SwapAction::Reject, SwapRole::Recipient)
            | (SwapStatus::Pending, SwapAction::Cancel, SwapRole::Requester)
            | (SwapStatus::Accepted, SwapAction::Complete, _)
            | (SwapStatus::Completed, SwapAction::Rate, _)
    )
}

/// Status reached by taking `action`, or an error if the table forbids it.
///
/// `Rate` leaves the status unchanged.
pub fn next_status(status: SwapStatus, action: SwapAction, role: SwapRole) -> Result<SwapStatus> {
    if !is_allowed(status, action, role) {
        return Err(Error::InvalidTransition {
            action: action.to_string(),
            status: status.to_string(),
            role: role.to_string(),
        });
    }
    Ok(action.target_status().unwrap_or(status))
}

/// Actions `role` may take from `status`, in display order.
pub fn actions_for(status: SwapStatus, role: SwapRole) -> Vec<SwapAction> {
    [
        SwapAction::Accept,
        SwapAction::Reject,
        SwapAction::Cancel,
        SwapAction::Complete,
        SwapAction::Rate,
    ]
    .into_iter()
    .filter(|action| is_allowed(status, *action, role))
    .collect()
}

/// Actions `viewer` may take on `swap`. Outsiders get none.
pub fn available_actions(swap: &Swap, viewer: UserId) -> Vec<SwapAction> {
    swap.role_of(viewer)
        .map(|role| actions_for(swap.status, role))
        .unwrap_or_default()
}
