//! Client Configuration
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Marketplace service address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8001";

/// Path prefix of every REST endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service origin (e.g., `http://localhost:8001`), without the API prefix
    pub api_url: String,

    /// Per-request timeout (default: 30s)
    pub request_timeout: Duration,

    /// Where the bearer token is persisted. `None` keeps it in memory only.
    pub session_file: Option<PathBuf>,

    /// How often the coin balance is re-read in the background (default: 60s)
    pub coin_poll_interval: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("SKILLSWAP_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
            request_timeout: Duration::from_secs(
                env::var("SKILLSWAP_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
            session_file: env::var("SKILLSWAP_SESSION_FILE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .or_else(default_session_file),
            coin_poll_interval: Duration::from_secs(
                env::var("SKILLSWAP_COIN_POLL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
            ),
        }
    }

    /// Configuration pointing at `api_url` with defaults and no persisted session.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            request_timeout: Duration::from_secs(30),
            session_file: None,
            coin_poll_interval: Duration::from_secs(60),
        }
    }

    /// Full REST base, e.g. `http://localhost:8001/api/v1`.
    pub fn api_base(&self) -> String {
        format!("{}{API_PREFIX}", self.api_url.trim_end_matches('/'))
    }
}

/// `<data dir>/skillswap/session.json`, if the platform has a data directory.
pub fn default_session_file() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("skillswap").join("session.json"))
}
