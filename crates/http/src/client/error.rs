//! Client error types

use ellp_core::{CoreError, ValidationErrors};
use serde::Deserialize;
use thiserror::Error;

/// Message shown when neither the server nor the transport gave anything useful
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Conflicting resource (duplicate email, ...)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Client-side validation rejected the input; nothing was sent
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// Access token expired and there is no refresh token to renew it
    #[error("No refresh token available")]
    NoRefreshToken,

    /// Token refresh was rejected or could not be sent; the session was cleared
    #[error("Token refresh failed: {0}")]
    RefreshFailed(#[source] Box<ClientError>),

    /// Session storage failed
    #[error("Session storage error: {0}")]
    Session(#[from] CoreError),
}

/// Error body returned by the API: `{"error": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ClientError {
    /// Create error from HTTP status code and the raw response body
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        let message = extract_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string())
        });

        match status.as_u16() {
            400 | 422 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Consume an error response
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::from_status(status, body)
    }

    /// HTTP status that caused this error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            Self::RefreshFailed(inner) => inner.status(),
            _ => None,
        }
    }

    /// True when the session was lost and the user has to log in again
    pub fn is_session_lost(&self) -> bool {
        matches!(self, Self::NoRefreshToken | Self::RefreshFailed(_))
    }

    /// Message suitable for showing to the user.
    ///
    /// Resource errors use the server's message; network errors fall back to
    /// a generic string.
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest(message)
            | Self::AuthenticationFailed(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::ServerError { message, .. }
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            Self::Validation(errors) => errors.to_string(),
            Self::NoRefreshToken | Self::RefreshFailed(_) => {
                "Your session has expired. Please log in again.".to_string()
            }
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => Some(parsed.error),
        Err(_) if body.starts_with('{') => None,
        Err(_) => Some(body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_server_message_is_extracted() {
        let err = ClientError::from_status(
            StatusCode::CONFLICT,
            r#"{"error":"Email já cadastrado"}"#.to_string(),
        );
        assert!(matches!(err, ClientError::Conflict(ref m) if m == "Email já cadastrado"));
        assert_eq!(err.user_message(), "Email já cadastrado");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_plain_text_and_empty_bodies() {
        let err = ClientError::from_status(StatusCode::NOT_FOUND, "missing".to_string());
        assert_eq!(err.user_message(), "missing");

        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, String::new());
        assert!(matches!(err, ClientError::ServerError { status: 502, ref message } if message == "Bad Gateway"));

        let err = ClientError::from_status(StatusCode::BAD_REQUEST, r#"{"detail":"x"}"#.into());
        assert_eq!(err.user_message(), "Bad Request");
    }

    #[test]
    fn test_session_loss_classification() {
        assert!(ClientError::NoRefreshToken.is_session_lost());
        let refresh = ClientError::RefreshFailed(Box::new(ClientError::AuthenticationFailed(
            "expired".into(),
        )));
        assert!(refresh.is_session_lost());
        assert_eq!(refresh.status(), Some(401));
        assert!(!ClientError::AuthenticationFailed("x".into()).is_session_lost());
    }
}
