//! Swap Lifecycle Manager
//!
//! Requests swaps and status transitions. The server authorizes and persists
//! every transition; after each mutation the full swap list is re-read so the
//! local view matches whatever the server decided. A failed request leaves the
//! local list untouched. When the re-read fails, the swap the server returned
//! replaces the cached copy.

use std::sync::Arc;

use skillswap_common::lifecycle::{available_actions, is_allowed};
use skillswap_common::{
    NewSwap, PublicUser, Skill, SkillId, Swap, SwapAction, SwapId, SwapStatus, UserId,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Swaps grouped the way the swap screen shows them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapTabs {
    /// Accepted and in progress.
    pub current: Vec<Swap>,
    /// Waiting for an answer.
    pub pending: Vec<Swap>,
    /// Completed, cancelled, or rejected.
    pub history: Vec<Swap>,
}

impl SwapTabs {
    pub fn group(swaps: &[Swap]) -> Self {
        let mut tabs = Self::default();
        for swap in swaps {
            match swap.status {
                SwapStatus::Accepted => tabs.current.push(swap.clone()),
                SwapStatus::Pending => tabs.pending.push(swap.clone()),
                SwapStatus::Completed | SwapStatus::Cancelled | SwapStatus::Rejected => {
                    tabs.history.push(swap.clone());
                }
            }
        }
        tabs
    }
}

/// Skills the requester can put up: their own offered listings.
pub fn eligible_offers(my_skills: &[Skill]) -> Vec<&Skill> {
    my_skills.iter().filter(|s| s.is_offered()).collect()
}

/// Skills that can be asked of `target`: their offered listings.
pub fn eligible_requests(target: &PublicUser) -> Vec<&Skill> {
    target.offered_skills().collect()
}

#[derive(Debug, Default)]
struct SwapList {
    owner: Option<UserId>,
    swaps: Vec<Swap>,
}

/// The current user's swaps and the actions on them.
#[derive(Debug)]
pub struct SwapManager {
    session: Arc<Session>,
    list: RwLock<SwapList>,
}

impl SwapManager {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            list: RwLock::new(SwapList::default()),
        }
    }

    pub const fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Reload from `GET /swaps`.
    pub async fn refresh(&self) -> ClientResult<Vec<Swap>> {
        let user = self.session.require_user()?;
        let swaps = self.session.api().my_swaps().await?;
        debug!(count = swaps.len(), "Swaps loaded");

        let mut list = self.list.write().await;
        list.owner = Some(user.id);
        list.swaps.clone_from(&swaps);
        Ok(swaps)
    }

    /// Cached swaps for the logged-in user. Empty after a user change.
    pub async fn swaps(&self) -> Vec<Swap> {
        let current = self.session.current_user().map(|u| u.id);
        let list = self.list.read().await;
        if current.is_some() && list.owner == current {
            list.swaps.clone()
        } else {
            Vec::new()
        }
    }

    pub async fn get(&self, id: SwapId) -> Option<Swap> {
        self.swaps().await.into_iter().find(|s| s.id == id)
    }

    pub async fn tabs(&self) -> SwapTabs {
        SwapTabs::group(&self.swaps().await)
    }

    /// Actions the logged-in user may take on `swap`.
    pub fn available_actions(&self, swap: &Swap) -> Vec<SwapAction> {
        self.session
            .current_user()
            .map(|user| available_actions(swap, user.id))
            .unwrap_or_default()
    }

    /// The other party of `swap`, seen from the logged-in user.
    pub fn counterpart(&self, swap: &Swap) -> ClientResult<UserId> {
        let user = self.session.require_user()?;
        Ok(swap.counterpart(user.id)?)
    }

    async fn refetch_after(&self, what: &str) {
        if let Err(e) = self.refresh().await {
            warn!("Failed to reload swaps after {}: {}", what, e);
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Ask `to_user_id` for `skill_requested_id` in exchange for `skill_offered_id`.
    ///
    /// Eligibility is left to the server; its message is returned verbatim.
    pub async fn request(
        &self,
        to_user_id: UserId,
        skill_offered_id: SkillId,
        skill_requested_id: SkillId,
    ) -> ClientResult<Swap> {
        self.session.require_user()?;
        let body = NewSwap {
            to_user_id,
            skill_offered_id,
            skill_requested_id,
        };
        let swap = self.session.api().create_swap(&body).await?;
        info!(swap_id = swap.id, to_user_id, "Swap requested");

        self.refetch_after("request").await;
        Ok(swap)
    }

    pub async fn accept(&self, id: SwapId) -> ClientResult<Swap> {
        self.transition(id, SwapAction::Accept).await
    }

    pub async fn reject(&self, id: SwapId) -> ClientResult<Swap> {
        self.transition(id, SwapAction::Reject).await
    }

    pub async fn complete(&self, id: SwapId) -> ClientResult<Swap> {
        self.transition(id, SwapAction::Complete).await
    }

    /// Withdraw a pending request (`DELETE /swaps/{id}`).
    pub async fn cancel(&self, id: SwapId) -> ClientResult<()> {
        self.session.require_user()?;
        self.session.api().cancel_swap(id).await?;
        info!(swap_id = id, "Swap cancelled");

        self.refetch_after("cancel").await;
        Ok(())
    }

    async fn transition(&self, id: SwapId, action: SwapAction) -> ClientResult<Swap> {
        let user = self.session.require_user()?;
        if let Some(known) = self.get(id).await {
            let allowed = known
                .role_of(user.id)
                .is_some_and(|role| is_allowed(known.status, action, role));
            if !allowed {
                debug!(swap_id = id, action = %action, status = %known.status,
                    "Local table disallows action, sending anyway");
            }
        }

        let returned = self.session.api().transition_swap(id, action).await?;
        info!(swap_id = id, action = %action, "Swap transition accepted by server");

        let reloaded = self.refresh().await;
        if let Err(e) = &reloaded {
            warn!("Failed to reload swaps after {}: {}", action, e);
        }

        match returned {
            Some(swap) => {
                if reloaded.is_err() {
                    self.store(user.id, &swap).await;
                }
                Ok(swap)
            }
            None => self.get(id).await.ok_or_else(|| {
                ClientError::Decode(format!("swap {id} missing after {action}"))
            }),
        }
    }

    /// Overwrite the cached copy of `swap` with what the server returned.
    async fn store(&self, owner: UserId, swap: &Swap) {
        let mut list = self.list.write().await;
        if list.owner != Some(owner) {
            return;
        }
        match list.swaps.iter_mut().find(|s| s.id == swap.id) {
            Some(cached) => cached.clone_from(swap),
            None => list.swaps.push(swap.clone()),
        }
    }
}
