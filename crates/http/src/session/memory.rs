use super::{TokenKey, TokenStore};
use ellp_core::{CoreResult, Session, User};
use std::sync::{PoisonError, RwLock};

/// Process-local token store; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: RwLock<Session>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing session
    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: TokenKey) -> Option<String> {
        let session = self.session.read().unwrap_or_else(PoisonError::into_inner);
        match key {
            TokenKey::Access => session.access_token.clone(),
            TokenKey::Refresh => session.refresh_token.clone(),
        }
    }

    fn set(&self, key: TokenKey, value: &str) -> CoreResult<()> {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        let slot = match key {
            TokenKey::Access => &mut session.access_token,
            TokenKey::Refresh => &mut session.refresh_token,
        };
        *slot = Some(value.to_string());
        Ok(())
    }

    fn user(&self) -> Option<User> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user
            .clone()
    }

    fn set_user(&self, user: Option<User>) -> CoreResult<()> {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .user = user;
        Ok(())
    }

    fn clear(&self) -> CoreResult<()> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Session::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ellp_core::TokenPair;

    #[test]
    fn test_set_get_clear() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(TokenKey::Access), None);

        store
            .set_tokens(&TokenPair {
                access_token: "a1".into(),
                refresh_token: "r1".into(),
            })
            .unwrap();
        assert_eq!(store.get(TokenKey::Access).as_deref(), Some("a1"));
        assert_eq!(store.get(TokenKey::Refresh).as_deref(), Some("r1"));

        store.clear().unwrap();
        assert_eq!(store.get(TokenKey::Access), None);
        assert_eq!(store.get(TokenKey::Refresh), None);
        assert_eq!(store.user(), None);
    }
}
