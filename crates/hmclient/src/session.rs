//! Session context: the current token, mirrored to durable storage.
//!
//! A token exists after a successful login (or username change) and is gone
//! after logout or a `TOKEN_INVALID` answer to a request that carried it.
//! Those are the only transitions.

use crate::storage::TokenStorage;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

/// Default storage key for the session token.
pub const DEFAULT_STORAGE_KEY: &str = "token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Authenticated,
    Unauthenticated,
}

/// Token holder shared by the dispatch client and its callers.
///
/// The in-memory token is authoritative. Storage failures are logged and do
/// not fail the update.
pub struct Session {
    token: RwLock<Option<String>>,
    storage: Arc<dyn TokenStorage>,
    key: String,
}

impl Session {
    /// An unauthenticated session. Nothing is read from storage.
    pub fn new(storage: Arc<dyn TokenStorage>, key: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(None),
            storage,
            key: key.into(),
        }
    }

    /// A session seeded with the token persisted under `key`, if any.
    pub fn restore(storage: Arc<dyn TokenStorage>, key: impl Into<String>) -> Self {
        let session = Self::new(storage, key);
        match session.storage.get(&session.key) {
            Ok(Some(token)) if !token.is_empty() => {
                tracing::debug!(key = %session.key, "Restored session token");
                *session.lock() = Some(token);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(key = %session.key, error = %e, "Failed to read session token"),
        }
        session
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.token().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Store a freshly issued token in memory and in storage.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        let mut guard = self.lock();
        if let Err(e) = self.storage.set(&self.key, &token) {
            tracing::warn!(key = %self.key, error = %e, "Failed to persist session token");
        }
        *guard = Some(token);
    }

    /// Forget the token in memory and in storage. Safe to call when already
    /// unauthenticated.
    pub fn clear_token(&self) {
        let mut guard = self.lock();
        self.remove_persisted();
        *guard = None;
    }

    /// Forget the token only if it is still `expected`, the token a
    /// rejected request carried. A token installed since then is kept.
    /// Returns whether the session was cleared.
    pub fn clear_token_if(&self, expected: Option<&str>) -> bool {
        let mut guard = self.lock();
        if guard.as_deref() != expected {
            return false;
        }
        self.remove_persisted();
        *guard = None;
        true
    }

    fn remove_persisted(&self) {
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "Failed to remove session token");
        }
    }

    // Storage writes happen under this lock so memory and storage change together.
    fn lock(&self) -> RwLockWriteGuard<'_, Option<String>> {
        match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("key", &self.key)
            .field("state", &self.state())
            .finish()
    }
}
