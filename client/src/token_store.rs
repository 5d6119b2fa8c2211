//! Bearer token persistence.
//!
//! The token is the only client state that survives a restart.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where the session token lives between runs.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> io::Result<Option<String>>;
    fn save(&self, token: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// JSON file holding `{ "token": ... }`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(stored) if !stored.token.is_empty() => Ok(Some(stored.token)),
            Ok(_) => Ok(None),
            Err(e) => {
                warn!(path = %self.path.display(), "Ignoring unreadable session file: {}", e);
                Ok(None)
            }
        }
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string(&StoredSession {
            token: token.to_string(),
        })
        .map_err(io::Error::other)?;
        fs::write(&self.path, body)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        debug!(path = %self.path.display(), "Session token saved");
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Keeps the token for the life of the process only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self
            .token
            .lock()
            .map_err(|_| io::Error::other("token lock poisoned"))?
            .clone())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *self
            .token
            .lock()
            .map_err(|_| io::Error::other("token lock poisoned"))? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self
            .token
            .lock()
            .map_err(|_| io::Error::other("token lock poisoned"))? = None;
        Ok(())
    }
}
