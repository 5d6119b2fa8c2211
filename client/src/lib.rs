//! `SkillSwap` Client Library
//!
//! Typed access to the marketplace service plus the controllers that back each
//! screen: session, skills, swaps, ratings, coins, directory, and admin.

pub mod admin;
pub mod api;
pub mod browse;
pub mod coins;
pub mod config;
pub mod error;
pub mod rating;
pub mod session;
pub mod skills;
pub mod swaps;
pub mod token_store;

use std::sync::Arc;

use tracing::debug;

pub use admin::AdminConsole;
pub use api::{ApiClient, PhotoUpload};
pub use browse::MemberDirectory;
pub use coins::{CoinLedger, LedgerState};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use rating::RatingCollector;
pub use session::Session;
pub use skills::SkillRegistry;
pub use swaps::{SwapManager, SwapTabs};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Every controller, wired to one session.
#[derive(Debug, Clone)]
pub struct Client {
    pub session: Arc<Session>,
    pub skills: Arc<SkillRegistry>,
    pub swaps: Arc<SwapManager>,
    pub ratings: Arc<RatingCollector>,
    pub coins: Arc<CoinLedger>,
    pub directory: Arc<MemberDirectory>,
    pub admin: Arc<AdminConsole>,
}

impl Client {
    /// Build from configuration, persisting the token where configured.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let api = ApiClient::new(config)?;
        let store: Arc<dyn TokenStore> = match &config.session_file {
            Some(path) => Arc::new(FileTokenStore::new(path.clone())),
            None => Arc::new(MemoryTokenStore::new()),
        };
        debug!(api = %api.base_url(), "Client configured");
        Ok(Self::with_session(Arc::new(Session::new(api, store))))
    }

    pub fn with_session(session: Arc<Session>) -> Self {
        let swaps = Arc::new(SwapManager::new(Arc::clone(&session)));
        Self {
            skills: Arc::new(SkillRegistry::new(Arc::clone(&session))),
            ratings: Arc::new(RatingCollector::new(Arc::clone(&swaps))),
            coins: Arc::new(CoinLedger::new(Arc::clone(&session))),
            directory: Arc::new(MemberDirectory::new(Arc::clone(&session))),
            admin: Arc::new(AdminConsole::new(Arc::clone(&session))),
            swaps,
            session,
        }
    }

    /// Log out and drop every controller's cached state.
    pub async fn logout(&self) {
        self.session.logout().await;
        self.skills.clear().await;
        self.coins.refresh().await;
    }
}
