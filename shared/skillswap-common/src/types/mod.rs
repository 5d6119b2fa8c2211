//! Marketplace entity types.
//!
//! One canonical type per server resource. Every view decodes into these.

pub mod admin;
pub mod coins;
pub mod rating;
pub mod skill;
pub mod swap;
pub mod user;

pub use admin::*;
pub use coins::*;
pub use rating::*;
pub use skill::*;
pub use swap::*;
pub use user::*;

/// Identifier of a user.
pub type UserId = i64;
/// Identifier of a skill listing.
pub type SkillId = i64;
/// Identifier of a swap request.
pub type SwapId = i64;

/// Generic `{ "message": ... }` acknowledgement returned by delete/ban style endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}
