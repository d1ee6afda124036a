use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role on the ELLP backend
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Member,
}

/// Authenticated account, as returned by the auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response of login and register
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthResponse {
    /// The bearer credentials carried by this response
    pub fn tokens(&self) -> TokenPair {
        TokenPair {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// Access and refresh token issued together by `/auth/refresh`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// `/auth/me` answers either `{"user": {...}}` or the bare user object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MeResponse {
    Wrapped { user: User },
    Bare(User),
}

impl MeResponse {
    pub fn into_user(self) -> User {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}

/// Client-side session: two opaque bearer strings plus the cached profile.
///
/// A non-empty access token is necessary for the session to count as
/// authenticated; it may still be expired, which is only discovered when a
/// request is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_me_response_accepts_both_shapes() {
        let user = json!({"id": "u1", "name": "Ana", "email": "ana@ellp.org", "role": "admin"});

        let wrapped: MeResponse = serde_json::from_value(json!({ "user": user.clone() })).unwrap();
        let bare: MeResponse = serde_json::from_value(user).unwrap();

        assert_eq!(wrapped.into_user().role, Role::Admin);
        assert_eq!(bare.into_user().name, "Ana");
    }

    #[test]
    fn test_session_requires_non_empty_access_token() {
        let mut session = Session::default();
        assert!(!session.is_authenticated());
        assert!(session.is_empty());

        session.access_token = Some(String::new());
        assert!(!session.is_authenticated());

        session.access_token = Some("abc".into());
        assert!(session.is_authenticated());
    }
}
