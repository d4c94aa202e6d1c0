//! # Session
//!
//! Explicit session object holding the bearer token.
//!
//! ```text
//! ┌──────────────┐  login ok   ┌──────────────┐
//! │ Anonymous    │────────────►│ Authenticated│
//! │ token: None  │◄────────────│ token: Some  │
//! └──────────────┘ logout/401  └──────────────┘
//!          ▲                          │
//!          └──── TokenStore ◄─────────┘  (persisted under `authToken`)
//! ```
//!
//! The token lives in memory for request signing and is mirrored into a
//! [`TokenStore`] so a restart keeps the operator signed in.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Token Store Trait
// =============================================================================

/// Key-value persistence for the session token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> ClientResult<Option<String>>;
    fn save(&self, token: &str) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        MemoryTokenStore {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> ClientResult<Option<String>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Small TOML key-value file holding the token under a fixed key.
///
/// ## File Format
/// ```toml
/// authToken = "eyJhbGciOi..."
/// ```
/// Other keys in the file are preserved on save and clear.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        FileTokenStore {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_table(&self) -> ClientResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| ClientError::Session(e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ClientError::Session(e.to_string()))
    }

    fn write_table(&self, table: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ClientError::Session(e.to_string()))?;
        }
        let contents =
            toml::to_string_pretty(table).map_err(|e| ClientError::Session(e.to_string()))?;
        std::fs::write(&self.path, contents).map_err(|e| ClientError::Session(e.to_string()))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> ClientResult<Option<String>> {
        let table = self.read_table()?;
        Ok(table.get(&self.key).filter(|t| !t.is_empty()).cloned())
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        let mut table = self.read_table()?;
        table.insert(self.key.clone(), token.to_string());
        self.write_table(&table)?;
        debug!(path = ?self.path, "Session token persisted");
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        let mut table = self.read_table()?;
        if table.remove(&self.key).is_some() {
            self.write_table(&table)?;
        }
        Ok(())
    }
}

// =============================================================================
// Session
// =============================================================================

/// Shared session handle. Cloning shares the same token.
#[derive(Clone)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    /// Creates a session backed by `store`, restoring any persisted token.
    pub fn restore(store: Arc<dyn TokenStore>) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to restore session token");
                None
            }
        };

        if token.is_some() {
            info!("Restored persisted session");
        }

        Session {
            token: Arc::new(RwLock::new(token)),
            store,
        }
    }

    /// An empty in-memory session.
    pub fn ephemeral() -> Self {
        Session::restore(Arc::new(MemoryTokenStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Stores a fresh token in memory and in the backing store.
    ///
    /// A persistence failure is logged; the in-memory session still works.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        if let Err(e) = self.store.save(&token) {
            warn!(error = %e, "Failed to persist session token");
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drops the token everywhere.
    pub fn clear(&self) {
        let had_token = self
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear persisted session token");
        }
        if had_token {
            info!("Session cleared");
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = Session::restore(store.clone());
        assert!(!session.is_authenticated());

        session.set_token("abc");
        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(store.load().unwrap().as_deref(), Some("abc"));

        let shared = session.clone();
        shared.clear();
        assert!(!session.is_authenticated());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_restore_from_store() {
        let session = Session::restore(Arc::new(MemoryTokenStore::with_token("persisted")));
        assert!(session.is_authenticated());
        assert!(!format!("{:?}", session).contains("persisted"));
    }

    #[test]
    fn test_file_store_uses_fixed_key_and_keeps_others() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("session.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "theme = \"dark\"\n").unwrap();

        let store = FileTokenStore::new(&path, "authToken");
        assert_eq!(store.load().unwrap(), None);

        store.save("tok-1").unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("authToken = \"tok-1\""));
        assert!(contents.contains("theme"));

        let reopened = FileTokenStore::new(&path, "authToken");
        assert_eq!(reopened.load().unwrap().as_deref(), Some("tok-1"));

        reopened.clear().unwrap();
        assert_eq!(reopened.load().unwrap(), None);
        assert!(std::fs::read_to_string(&path).unwrap().contains("theme"));
    }

    #[test]
    fn test_file_store_corrupt_file_is_session_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let store = FileTokenStore::new(&path, "authToken");
        assert!(matches!(store.load(), Err(ClientError::Session(_))));

        let session = Session::restore(Arc::new(store));
        assert!(!session.is_authenticated());
    }
}
