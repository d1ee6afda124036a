//! ELLP API client
//!
//! One shared [`ApiClient`] issues every request. It attaches the current
//! access token as a bearer credential and, when the server answers 401,
//! refreshes the token pair once and replays the original request once.

pub mod auth;
pub mod error;
pub mod volunteers;
pub mod workshops;

use crate::session::{SessionManager, TokenStore};
use ellp_core::types::QueryParams;
use ellp_core::{RefreshRequest, TokenPair};
use error::ClientError;
use reqwest::{Client, ClientBuilder, Method, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Default API location, matching the backend's development setup
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Path of the token refresh endpoint, relative to the base URL
pub const REFRESH_PATH: &str = "/auth/refresh";

const USER_AGENT: &str = concat!("ellp-client/", env!("CARGO_PKG_VERSION"));

/// Called after the session has been cleared because a refresh failed.
/// Front ends use it to send the user back to the login entry point.
pub type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

/// Position of a dispatch within one logical call.
///
/// The first dispatch is attempt 0; a replay after a successful refresh is
/// attempt 1. A logical call is replayed at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Attempt(u8);

impl Attempt {
    pub const FIRST: Self = Self(0);

    /// Replays allowed per logical call
    pub const MAX_REPLAYS: u8 = 1;

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn can_replay(self) -> bool {
        self.0 < Self::MAX_REPLAYS
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Description of one logical API call; replayable after a token refresh
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: QueryParams,
    body: Option<serde_json::Value>,
    refreshable: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
            refreshable: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append query parameters
    pub fn query(mut self, params: QueryParams) -> Self {
        self.query.extend(params);
        self
    }

    /// Attach a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Do not run the refresh protocol when this request is answered 401.
    ///
    /// Used for credential exchanges, where 401 means wrong credentials.
    pub fn without_refresh(mut self) -> Self {
        self.refreshable = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_refreshable(&self) -> bool {
        self.refreshable
    }
}

struct ClientInner {
    http: Client,
    base_url: String,
    session: SessionManager,
    /// Serializes refreshes so concurrent 401s share one refresh call
    refresh_guard: Mutex<()>,
    on_session_expired: Option<SessionExpiredHook>,
}

/// ELLP API client
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    /// Create a new client with default configuration and an in-memory session
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Session shared with the services
    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    pub fn auth(&self) -> auth::AuthApi<'_> {
        auth::AuthApi::new(self)
    }

    pub fn volunteers(&self) -> volunteers::VolunteersApi<'_> {
        volunteers::VolunteersApi::new(self)
    }

    pub fn workshops(&self) -> workshops::WorkshopsApi<'_> {
        workshops::WorkshopsApi::new(self)
    }

    /// Issue a logical call, running the refresh protocol on 401.
    ///
    /// Success responses are returned unchanged. Any other error status, or a
    /// second 401 after a replay, is propagated to the caller.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: &ApiRequest) -> Result<Response, ClientError> {
        let mut attempt = Attempt::FIRST;
        loop {
            let token = self.inner.session.access_token();
            let response = self.dispatch(request, token.as_deref()).await?;
            let status = response.status();
            debug!(%status, attempt = attempt.number(), "response received");

            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::UNAUTHORIZED && request.refreshable && attempt.can_replay() {
                // Mark the call as replayed before refreshing so a second 401 is final
                attempt = attempt.next();
                self.refresh_after(token.as_deref()).await?;
                debug!("replaying request with refreshed token");
                continue;
            }

            return Err(ClientError::from_response(response).await);
        }
    }

    /// Execute a request and decode a JSON body
    pub async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Execute a request whose response body is irrelevant
    pub async fn execute_empty(&self, request: &ApiRequest) -> Result<(), ClientError> {
        self.send(request).await.map(drop)
    }

    /// Exchange the refresh token for a new pair, outside of any failed request
    pub async fn refresh_session(&self) -> Result<(), ClientError> {
        let stale = self.inner.session.access_token();
        self.refresh_after(stale.as_deref()).await
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.inner.base_url, request.path);
        let mut builder = self.inner.http.request(request.method.clone(), url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    /// Run the refresh protocol for a call that was rejected while holding `stale`.
    ///
    /// Only one refresh runs at a time. A caller that waited for another
    /// refresh finds the access token already rotated and returns without
    /// issuing its own.
    async fn refresh_after(&self, stale: Option<&str>) -> Result<(), ClientError> {
        let _guard = self.inner.refresh_guard.lock().await;

        match (self.inner.session.access_token(), stale) {
            (Some(current), Some(stale)) if current != stale => {
                debug!("access token already rotated by a concurrent refresh");
                return Ok(());
            }
            (Some(_), None) => {
                debug!("access token stored by a concurrent login or refresh");
                return Ok(());
            }
            (None, Some(_)) => {
                // A concurrent refresh failed and already cleared the session
                return Err(ClientError::NoRefreshToken);
            }
            _ => {}
        }

        let outcome = match self.request_new_tokens().await {
            Ok(tokens) => self
                .inner
                .session
                .store_tokens(&tokens)
                .map_err(|err| ClientError::RefreshFailed(Box::new(err.into()))),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => {
                info!("access token refreshed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, clearing session");
                self.expire_session();
                Err(err)
            }
        }
    }

    async fn request_new_tokens(&self) -> Result<TokenPair, ClientError> {
        let refresh_token = self
            .inner
            .session
            .refresh_token()
            .ok_or(ClientError::NoRefreshToken)?;

        let wrap = |err: ClientError| ClientError::RefreshFailed(Box::new(err));

        // Sent without the bearer header
        let url = format!("{}{}", self.inner.base_url, REFRESH_PATH);
        let response = self
            .inner
            .http
            .post(url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|err| wrap(err.into()))?;

        if !response.status().is_success() {
            return Err(wrap(ClientError::from_response(response).await));
        }

        let bytes = response.bytes().await.map_err(|err| wrap(err.into()))?;
        serde_json::from_slice(&bytes).map_err(|err| wrap(err.into()))
    }

    fn expire_session(&self) {
        if let Err(err) = self.inner.session.clear() {
            warn!(error = %err, "failed to clear session storage");
        }
        if let Some(hook) = &self.inner.on_session_expired {
            hook();
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("session", &self.inner.session)
            .finish()
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    session: Option<SessionManager>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    on_session_expired: Option<SessionExpiredHook>,
}

impl ApiClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Persist the session in `store`
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.session = Some(SessionManager::new(store));
        self
    }

    /// Share an existing session handle
    pub fn session(mut self, session: SessionManager) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the request timeout. No timeout is applied unless set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Callback run after a failed refresh cleared the session
    pub fn on_session_expired(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_expired = Some(Arc::new(hook));
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        url::Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url {base_url}: {e}")))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut client_builder = ClientBuilder::new().default_headers(headers);

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout; // Timeouts not supported on WASM

        client_builder =
            client_builder.user_agent(self.user_agent.unwrap_or_else(|| USER_AGENT.to_string()));

        let http = client_builder.build()?;

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                session: self.session.unwrap_or_else(SessionManager::in_memory),
                refresh_guard: Mutex::new(()),
                on_session_expired: self.on_session_expired,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_allows_a_single_replay() {
        let first = Attempt::FIRST;
        assert!(first.can_replay());
        let replay = first.next();
        assert_eq!(replay.number(), 1);
        assert!(!replay.can_replay());
        assert!(!replay.next().can_replay());
    }

    #[test]
    fn test_builder_requires_valid_base_url() {
        assert!(matches!(
            ApiClient::builder().build(),
            Err(ClientError::Configuration(_))
        ));
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ClientError::Configuration(_))
        ));

        let client = ApiClient::new("http://localhost:8080/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert!(!client.session().is_authenticated());
    }

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::post("/auth/login")
            .json(&serde_json::json!({"email": "a@b.com"}))
            .unwrap()
            .without_refresh();
        assert_eq!(*request.method(), Method::POST);
        assert_eq!(request.path(), "/auth/login");
        assert!(!request.is_refreshable());
        assert!(ApiRequest::get("/volunteers").is_refreshable());
    }
}
