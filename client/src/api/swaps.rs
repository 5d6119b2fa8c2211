//! Swap and rating endpoints.

use serde_json::Value;
use skillswap_common::{Acknowledgement, NewRating, NewSwap, Rating, Swap, SwapAction, SwapId};

use super::ApiClient;
use crate::error::{ClientError, ClientResult};

impl ApiClient {
    /// `GET /swaps`, every swap the current user takes part in.
    pub async fn my_swaps(&self) -> ClientResult<Vec<Swap>> {
        self.get("/swaps").await
    }

    /// `POST /swaps`.
    pub async fn create_swap(&self, swap: &NewSwap) -> ClientResult<Swap> {
        self.post("/swaps", swap).await
    }

    /// `PUT /swaps/{id}/accept|reject|complete`.
    ///
    /// Returns the updated swap when the response body carries one.
    pub async fn transition_swap(&self, id: SwapId, action: SwapAction) -> ClientResult<Option<Swap>> {
        match action {
            SwapAction::Accept | SwapAction::Reject | SwapAction::Complete => {}
            SwapAction::Cancel | SwapAction::Rate => {
                return Err(ClientError::NotEligible(format!(
                    "'{}' is not a status transition endpoint",
                    action.as_str()
                )))
            }
        }
        let body: Value = self
            .put_empty(&format!("/swaps/{id}/{}", action.as_str()))
            .await?;
        Ok(serde_json::from_value(body).ok())
    }

    /// `DELETE /swaps/{id}`, cancelling a pending request.
    pub async fn cancel_swap(&self, id: SwapId) -> ClientResult<Option<Acknowledgement>> {
        self.delete(&format!("/swaps/{id}")).await
    }

    /// `POST /swaps/{id}/rate`.
    pub async fn rate_swap(&self, id: SwapId, rating: &NewRating) -> ClientResult<Rating> {
        self.post(&format!("/swaps/{id}/rate"), rating).await
    }

    /// `GET /swaps/{id}/ratings`.
    pub async fn swap_ratings(&self, id: SwapId) -> ClientResult<Vec<Rating>> {
        self.get(&format!("/swaps/{id}/ratings")).await
    }
}
