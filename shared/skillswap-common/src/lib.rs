//! `SkillSwap` Common Library
//!
//! Shared types, swap lifecycle rules, and client-side validation used by the
//! API client and the command-line front end.

pub mod envelope;
pub mod error;
pub mod forms;
pub mod lifecycle;
pub mod matching;
pub mod types;
pub mod validation;

pub use envelope::{ApiResponse, ErrorBody};
pub use error::{Error, Result};
pub use lifecycle::{SwapAction, SwapRole};
pub use types::*;
