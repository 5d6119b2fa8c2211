//! Coin balance endpoints.

use skillswap_common::{CoinAdjustment, CoinBalance, SwapBonus};

use super::ApiClient;
use crate::error::{ClientError, ClientResult};

fn positive(amount: i64) -> ClientResult<i64> {
    if amount > 0 {
        Ok(amount)
    } else {
        Err(ClientError::invalid_field(
            "amount",
            "Amount must be positive",
        ))
    }
}

impl ApiClient {
    /// `GET /coins`.
    pub async fn coins(&self) -> ClientResult<CoinBalance> {
        self.get("/coins").await
    }

    /// `POST /coins/add?amount=n`.
    pub async fn add_coins(&self, amount: i64) -> ClientResult<CoinAdjustment> {
        let amount = positive(amount)?;
        self.post_with_query("/coins/add", &[("amount", amount)])
            .await
    }

    /// `POST /coins/deduct?amount=n`. The server refuses overdrafts.
    pub async fn deduct_coins(&self, amount: i64) -> ClientResult<CoinAdjustment> {
        let amount = positive(amount)?;
        self.post_with_query("/coins/deduct", &[("amount", amount)])
            .await
    }

    /// `POST /coins/check-swap-bonus`.
    pub async fn check_swap_bonus(&self) -> ClientResult<SwapBonus> {
        self.post_with_query("/coins/check-swap-bonus", &[] as &[(&str, i64)])
            .await
    }
}
