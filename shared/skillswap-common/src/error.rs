//! Common Error Types

use thiserror::Error;

/// Errors raised by the shared model layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A string could not be parsed into one of the closed enums.
    #[error("Invalid {kind}: '{value}'")]
    InvalidValue {
        /// Which enum was being parsed (e.g. "skill level").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// The lifecycle table does not allow this action from this state.
    #[error("Cannot {action} a {status} swap as the {role}")]
    InvalidTransition {
        /// Requested action.
        action: String,
        /// Current status.
        status: String,
        /// Role of the acting user.
        role: String,
    },

    /// The user is not a party to the swap.
    #[error("User {user_id} is not a participant in swap {swap_id}")]
    NotParticipant {
        /// The swap.
        swap_id: i64,
        /// The user who tried to act.
        user_id: i64,
    },
}

/// Result alias for the common crate.
pub type Result<T> = std::result::Result<T, Error>;
