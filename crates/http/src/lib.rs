//! ELLP HTTP client
//!
//! Authenticated access to the ELLP REST API: a token store that survives
//! restarts, a shared client that attaches the bearer credential and replays
//! a request once after refreshing an expired access token, and typed
//! services for auth, volunteers and workshops.

pub mod client;
pub mod session;

pub use client::{
    ApiClient, ApiClientBuilder, ApiRequest, Attempt, DEFAULT_BASE_URL, SessionExpiredHook,
    auth::AuthApi,
    error::ClientError,
    volunteers::VolunteersApi,
    workshops::WorkshopsApi,
};
pub use session::{MemoryTokenStore, SessionManager, TokenKey, TokenStore};

#[cfg(not(target_arch = "wasm32"))]
pub use session::FileTokenStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use session::LocalStorageTokenStore;
