//! Client-side session persistence
//!
//! The session is two opaque bearer strings plus an optional cached profile.
//! Stores persist every write immediately; nothing tracks expiry, which is
//! discovered only when the server rejects a request.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;

pub use memory::MemoryTokenStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileTokenStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorageTokenStore;

use ellp_core::{AuthResponse, CoreResult, Session, TokenPair, User};
use std::sync::Arc;
use tracing::debug;

/// Storage key of the cached user record
pub const USER_KEY: &str = "user";

/// Named token slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    Access,
    Refresh,
}

impl TokenKey {
    /// Fixed name the slot is persisted under
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Access => "access_token",
            Self::Refresh => "refresh_token",
        }
    }
}

/// Persistent key/value storage for the session.
///
/// Implementations must persist each `set`/`clear` before returning.
/// Concurrent writers race with last-write-wins semantics.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: TokenKey) -> Option<String>;

    fn set(&self, key: TokenKey, value: &str) -> CoreResult<()>;

    /// Overwrite both token slots together
    fn set_tokens(&self, tokens: &TokenPair) -> CoreResult<()> {
        self.set(TokenKey::Access, &tokens.access_token)?;
        self.set(TokenKey::Refresh, &tokens.refresh_token)
    }

    fn user(&self) -> Option<User>;

    fn set_user(&self, user: Option<User>) -> CoreResult<()>;

    /// Remove tokens and cached user
    fn clear(&self) -> CoreResult<()>;
}

/// Session handle injected into the client and the services.
///
/// Cheap to clone; all clones share the same underlying store.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Session backed by an in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(TokenKey::Access).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(TokenKey::Refresh).filter(|t| !t.is_empty())
    }

    pub fn cached_user(&self) -> Option<User> {
        self.store.user()
    }

    /// True when an access token is present. It may still be expired.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Persist the session created by a login or registration
    pub fn store_auth(&self, auth: &AuthResponse) -> CoreResult<()> {
        self.store.set_tokens(&auth.tokens())?;
        self.store.set_user(auth.user.clone())?;
        debug!(user = ?auth.user.as_ref().map(|u| &u.id), "session stored");
        Ok(())
    }

    /// Replace both tokens after a refresh
    pub fn store_tokens(&self, tokens: &TokenPair) -> CoreResult<()> {
        self.store.set_tokens(tokens)
    }

    pub fn store_user(&self, user: &User) -> CoreResult<()> {
        self.store.set_user(Some(user.clone()))
    }

    pub fn clear(&self) -> CoreResult<()> {
        debug!("clearing session");
        self.store.clear()
    }

    /// Current contents, for display and diagnostics
    pub fn snapshot(&self) -> Session {
        Session {
            access_token: self.access_token(),
            refresh_token: self.refresh_token(),
            user: self.cached_user(),
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
