//! Coin Ledger
//!
//! Read-only balance display. Loaded on start, whenever the session user
//! changes, and on a fixed poll interval while a watcher runs.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error};

use crate::session::Session;

/// Shown when the balance cannot be read.
pub const LOAD_FAILED: &str = "Failed to load coins";

/// Shortest poll interval a watcher will use.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What the balance widget shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LedgerState {
    /// No user logged in.
    #[default]
    Idle,
    Loading,
    Loaded(i64),
    Failed(String),
}

impl LedgerState {
    pub const fn balance(&self) -> Option<i64> {
        match self {
            Self::Loaded(coins) => Some(*coins),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct CoinLedger {
    session: Arc<Session>,
    state: watch::Sender<LedgerState>,
}

impl CoinLedger {
    pub fn new(session: Arc<Session>) -> Self {
        let (state, _) = watch::channel(LedgerState::Idle);
        Self { session, state }
    }

    pub fn state(&self) -> LedgerState {
        self.state.borrow().clone()
    }

    pub fn balance(&self) -> Option<i64> {
        self.state.borrow().balance()
    }

    /// Receiver for balance widget updates.
    pub fn subscribe(&self) -> watch::Receiver<LedgerState> {
        self.state.subscribe()
    }

    /// Re-read `GET /coins` for the current user.
    pub async fn refresh(&self) -> LedgerState {
        if !self.session.is_authenticated() {
            self.state.send_replace(LedgerState::Idle);
            return LedgerState::Idle;
        }

        self.state.send_replace(LedgerState::Loading);
        let next = match self.session.api().coins().await {
            Ok(balance) => {
                debug!(coins = balance.coins, "Coin balance loaded");
                LedgerState::Loaded(balance.coins)
            }
            Err(e) => {
                error!("Failed to load coins: {}", e);
                LedgerState::Failed(LOAD_FAILED.to_string())
            }
        };
        self.state.send_replace(next.clone());
        next
    }

    /// Spawn a task that refreshes on every user change and every `poll`,
    /// raised to at least [`MIN_POLL_INTERVAL`].
    ///
    /// The task holds only a weak reference and stops once the ledger is dropped.
    pub fn spawn_watcher(self: &Arc<Self>, poll: Duration) -> JoinHandle<()> {
        let ledger: Weak<Self> = Arc::downgrade(self);
        let mut users = self.session.subscribe();
        let poll = poll.max(MIN_POLL_INTERVAL);

        tokio::spawn(async move {
            let mut ticker = interval(poll);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    changed = users.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {}
                }

                let Some(ledger) = ledger.upgrade() else {
                    break;
                };
                ledger.refresh().await;
            }
            debug!("Coin watcher stopped");
        })
    }
}
