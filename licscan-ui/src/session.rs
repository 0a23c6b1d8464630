//! Session store
//!
//! Holds zero or one bearer token for the whole process. The token survives
//! restarts through a [`TokenStorage`] backend and is the only
//! authentication signal: there is no expiry or refresh handling, a stale
//! token is only discovered when a backend request fails.
//!
//! Lifecycle: [`SessionStore::init`] (load from storage) →
//! [`SessionStore::login`] / [`SessionStore::logout`]. Writes only come from
//! those two controller actions.

use licscan_common::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info};

/// File name of the persisted token inside the data folder
pub const TOKEN_STORAGE_KEY: &str = "access_token";

/// Persistence backend for the bearer token
pub trait TokenStorage: Send + Sync {
    /// Read the persisted token, `None` when absent
    fn load(&self) -> Result<Option<String>>;

    /// Persist a token, replacing any previous one
    fn save(&self, token: &str) -> Result<()>;

    /// Remove the persisted token; removing an absent token is not an error
    fn clear(&self) -> Result<()>;
}

/// Token persisted as a plain string in `<data_folder>/access_token`
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(data_folder: &Path) -> Self {
        Self {
            path: data_folder.join(TOKEN_STORAGE_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(format!(
                "Read {} failed: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)
            .map_err(|e| Error::Storage(format!("Write {} failed: {}", self.path.display(), e)))
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(format!(
                "Remove {} failed: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// In-memory token storage (nothing survives a restart)
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.token
            .lock()
            .map_err(|_| Error::Internal("token storage lock poisoned".to_string()))
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot()? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot()? = None;
        Ok(())
    }
}

/// Process-wide session handle
///
/// Cloning is cheap; all clones observe the same token. The current token
/// lives in a `watch` channel so readers get it synchronously and
/// subscribers are woken on every login/logout.
#[derive(Clone)]
pub struct SessionStore {
    token: Arc<watch::Sender<Option<String>>>,
    storage: Arc<dyn TokenStorage>,
}

impl SessionStore {
    /// Create the store from whatever token the storage already holds
    pub fn init(storage: Arc<dyn TokenStorage>) -> Result<Self> {
        let token = storage.load()?;
        if token.is_some() {
            info!("Restored persisted session token");
        } else {
            debug!("No persisted session token");
        }

        let (tx, _rx) = watch::channel(token);
        Ok(Self {
            token: Arc::new(tx),
            storage,
        })
    }

    /// Store with in-memory persistence and no token
    pub fn in_memory() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            token: Arc::new(tx),
            storage: Arc::new(MemoryTokenStorage::new()),
        }
    }

    /// Persist the token and mark the session authenticated
    ///
    /// Nothing changes in memory if persisting fails.
    pub fn login(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.storage.save(&token)?;
        self.token.send_replace(Some(token));
        info!("Session established");
        Ok(())
    }

    /// Clear the persisted token and mark the session unauthenticated
    pub fn logout(&self) -> Result<()> {
        let cleared = self.storage.clear();
        // The in-memory session ends even if the file could not be removed.
        self.token.send_replace(None);
        info!("Session ended");
        cleared
    }

    /// Derived purely from token presence
    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    /// Receiver notified on every login and logout
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token.subscribe()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
