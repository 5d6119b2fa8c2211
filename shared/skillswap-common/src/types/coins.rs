//! Coin Types
//!
//! Balances are maintained server-side; the client only reads them.

use serde::{Deserialize, Serialize};

/// `GET /coins`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinBalance {
    #[serde(default)]
    pub coins: i64,
}

/// `POST /coins/add` and `POST /coins/deduct`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinAdjustment {
    pub coins: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deducted: Option<i64>,
}

/// `POST /coins/check-swap-bonus`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapBonus {
    pub coins: i64,
    #[serde(default)]
    pub bonus_awarded: i64,
    #[serde(default)]
    pub completed_swaps: i64,
}
