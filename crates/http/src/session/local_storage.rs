use super::{TokenKey, TokenStore, USER_KEY};
use ellp_core::{CoreError, CoreResult, User};
use gloo::storage::{LocalStorage, Storage};

/// Token store backed by the browser's localStorage.
///
/// Tokens are kept as raw strings under `access_token` / `refresh_token`, the
/// user record as JSON under `user`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageTokenStore;

impl LocalStorageTokenStore {
    pub fn new() -> Self {
        Self
    }
}

fn storage_error(err: impl std::fmt::Debug) -> CoreError {
    CoreError::storage_error(format!("{err:?}"))
}

impl TokenStore for LocalStorageTokenStore {
    fn get(&self, key: TokenKey) -> Option<String> {
        LocalStorage::raw()
            .get_item(key.storage_key())
            .ok()
            .flatten()
    }

    fn set(&self, key: TokenKey, value: &str) -> CoreResult<()> {
        LocalStorage::raw()
            .set_item(key.storage_key(), value)
            .map_err(storage_error)
    }

    fn user(&self) -> Option<User> {
        LocalStorage::get::<User>(USER_KEY).ok()
    }

    fn set_user(&self, user: Option<User>) -> CoreResult<()> {
        match user {
            Some(user) => LocalStorage::set(USER_KEY, user).map_err(storage_error),
            None => {
                LocalStorage::delete(USER_KEY);
                Ok(())
            }
        }
    }

    fn clear(&self) -> CoreResult<()> {
        LocalStorage::delete(TokenKey::Access.storage_key());
        LocalStorage::delete(TokenKey::Refresh.storage_key());
        LocalStorage::delete(USER_KEY);
        Ok(())
    }
}
