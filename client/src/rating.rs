//! Rating Collector
//!
//! Stars and feedback for a completed swap. Duplicate ratings are refused by
//! the server, not here.

use std::sync::Arc;

use skillswap_common::validation::{message_of, validate_stars};
use skillswap_common::{NewRating, Rating, Swap, SwapId, SwapStatus, UserStats};
use tracing::{info, warn};

use crate::error::{ClientError, ClientResult};
use crate::swaps::SwapManager;

/// An open rating form for one swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingDraft {
    swap: Swap,
    /// 0 means "not selected yet".
    pub stars: u8,
    pub feedback: String,
}

impl RatingDraft {
    pub const fn swap(&self) -> &Swap {
        &self.swap
    }

    #[must_use]
    pub const fn with_stars(mut self, stars: u8) -> Self {
        self.stars = stars;
        self
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = feedback.into();
        self
    }

    fn feedback_text(&self) -> Option<String> {
        let trimmed = self.feedback.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingOutcome {
    pub rating: Rating,
    /// Fresh stats, when they could be reloaded.
    pub stats: Option<UserStats>,
}

#[derive(Debug)]
pub struct RatingCollector {
    swaps: Arc<SwapManager>,
}

impl RatingCollector {
    pub const fn new(swaps: Arc<SwapManager>) -> Self {
        Self { swaps }
    }

    /// Open the form. Only completed swaps the user took part in qualify.
    pub fn open(&self, swap: &Swap) -> ClientResult<RatingDraft> {
        let user = self.swaps.session().require_user()?;
        if swap.status != SwapStatus::Completed {
            return Err(ClientError::NotEligible(format!(
                "Only completed swaps can be rated (swap {} is {})",
                swap.id, swap.status
            )));
        }
        swap.counterpart(user.id)?;

        Ok(RatingDraft {
            swap: swap.clone(),
            stars: 0,
            feedback: String::new(),
        })
    }

    /// Validate and post the rating, then reload swaps and stats.
    pub async fn submit(&self, draft: &RatingDraft) -> ClientResult<RatingOutcome> {
        validate_stars(draft.stars)
            .map_err(|e| ClientError::invalid_field("stars", message_of(&e)))?;

        let session = self.swaps.session();
        let user = session.require_user()?;
        let to_user_id = draft.swap.counterpart(user.id)?;
        let body = NewRating {
            to_user_id,
            stars: draft.stars,
            feedback: draft.feedback_text(),
        };

        let rating = session.api().rate_swap(draft.swap.id, &body).await?;
        info!(swap_id = draft.swap.id, to_user_id, stars = draft.stars, "Rating submitted");

        if let Err(e) = self.swaps.refresh().await {
            warn!("Failed to reload swaps after rating: {}", e);
        }
        let stats = match session.stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!("Failed to reload stats after rating: {}", e);
                None
            }
        };

        Ok(RatingOutcome { rating, stats })
    }

    /// `GET /swaps/{id}/ratings`.
    pub async fn ratings_for(&self, swap_id: SwapId) -> ClientResult<Vec<Rating>> {
        let session = self.swaps.session();
        session.require_user()?;
        session.api().swap_ratings(swap_id).await
    }
}
