//! Authentication endpoints

use super::{ApiClient, ApiRequest, error::ClientError};
use ellp_core::types::MeResponse;
use ellp_core::{AuthResponse, LoginRequest, RegisterRequest, User, Validate};
use tracing::{info, instrument, warn};

/// Login, registration and session lifecycle
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a session and persist it
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ClientError> {
        credentials.validate()?;
        let request = ApiRequest::post("/auth/login")
            .json(credentials)?
            .without_refresh();
        let auth: AuthResponse = self.client.execute(&request).await?;
        self.client.session().store_auth(&auth)?;
        info!("logged in");
        Ok(auth)
    }

    /// Create an account; the server logs the new user in
    #[instrument(skip_all, fields(email = %data.email))]
    pub async fn register(&self, data: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        data.validate()?;
        let request = ApiRequest::post("/auth/register")
            .json(data)?
            .without_refresh();
        let auth: AuthResponse = self.client.execute(&request).await?;
        self.client.session().store_auth(&auth)?;
        info!("registered");
        Ok(auth)
    }

    /// End the session. The local session is cleared even when the server
    /// call fails; the server error is still returned.
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self
            .client
            .execute_empty(&ApiRequest::post("/auth/logout").without_refresh())
            .await;
        if let Err(err) = &result {
            warn!(error = %err, "logout request failed");
        }
        self.client.session().clear()?;
        info!("logged out");
        result
    }

    /// Fetch the current user and cache it in the session
    pub async fn me(&self) -> Result<User, ClientError> {
        let response: MeResponse = self.client.execute(&ApiRequest::get("/auth/me")).await?;
        let user = response.into_user();
        self.client.session().store_user(&user)?;
        Ok(user)
    }

    /// Renew the token pair ahead of any failed request
    pub async fn refresh(&self) -> Result<(), ClientError> {
        self.client.refresh_session().await
    }

    /// True when an access token is stored; it may still be expired
    pub fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated()
    }

    pub fn cached_user(&self) -> Option<User> {
        self.client.session().cached_user()
    }
}
