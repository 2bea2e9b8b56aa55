//! Session management for Monzo API authentication.

use chrono::{DateTime, Duration, Utc};
use oauth2::RefreshToken;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Error, Result};

use super::token::{token_error, OAuthConfig, Token};

/// Authentication state for the Monzo API.
///
/// Holds the current access token and, when an [`OAuthConfig`] and a
/// refresh token are available, knows how to renew it.
///
/// # Thread Safety
///
/// `Session` is cheap to clone and shared across tasks. Token updates are
/// serialized behind an internal lock.
#[derive(Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionInner>>,
    oauth: Option<Arc<OAuthConfig>>,
    http: reqwest::Client,
}

struct SessionInner {
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    token_type: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session from a token.
    ///
    /// Without `oauth` the session never refreshes; the token is used as-is
    /// until the API rejects it.
    pub fn new(token: Token, oauth: Option<OAuthConfig>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner::from(token))),
            oauth: oauth.map(Arc::new),
            http: reqwest::Client::new(),
        }
    }

    /// Use `http` for token refresh requests instead of a default client.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Returns `true` if the session has what it needs to refresh.
    pub async fn can_refresh(&self) -> bool {
        self.oauth.is_some() && self.inner.read().await.refresh_token.is_some()
    }

    /// Check if the access token has expired. Unknown expiry counts as valid.
    pub async fn is_expired(&self) -> bool {
        self.expires_within(Duration::zero()).await
    }

    /// Check if the session will expire within the given buffer period.
    pub async fn expires_within(&self, buffer: Duration) -> bool {
        let inner = self.inner.read().await;
        inner
            .expires_at
            .is_some_and(|expires_at| Utc::now() + buffer >= expires_at)
    }

    /// Get the session expiration time, if known.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.expires_at
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the session has no OAuth config
    /// or refresh token, or if the token endpoint rejects the refresh.
    /// Returns [`Error::UrlParse`] if the configured endpoints are not URLs.
    pub async fn refresh(&self) -> Result<()> {
        let oauth = self.oauth.as_ref().ok_or_else(|| {
            Error::Authentication("session has no OAuth configuration".to_string())
        })?;
        let client = oauth.client()?;

        let mut inner = self.inner.write().await;
        let refresh_token = inner
            .refresh_token
            .as_ref()
            .ok_or_else(|| Error::Authentication("session has no refresh token".to_string()))?;

        let refresh_token = RefreshToken::new(refresh_token.expose_secret().to_string());
        let response = client
            .exchange_refresh_token(&refresh_token)
            .request_async(&self.http)
            .await
            .map_err(token_error)?;
        let token = Token::from_response(&response);

        tracing::debug!(expires_at = ?token.expiry, "access token refreshed");
        let previous_refresh = inner.refresh_token.take();
        *inner = SessionInner::from(token);
        // Monzo rotates refresh tokens, but keep the old one if none came back.
        if inner.refresh_token.is_none() {
            inner.refresh_token = previous_refresh;
        }
        Ok(())
    }

    /// Refresh the token if it expires within `buffer` and refresh is possible.
    pub async fn ensure_valid(&self, buffer: Duration) -> Result<()> {
        if self.expires_within(buffer).await && self.can_refresh().await {
            tracing::info!("access token near expiry, refreshing");
            self.refresh().await?;
        }
        Ok(())
    }

    /// Get the current access token.
    pub(crate) async fn access_token(&self) -> SecretString {
        self.inner.read().await.access_token.clone()
    }

    /// Snapshot the current token, e.g. to persist it after a refresh.
    pub async fn token(&self) -> Token {
        let inner = self.inner.read().await;
        Token {
            access_token: inner.access_token.expose_secret().to_string(),
            refresh_token: inner
                .refresh_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
            token_type: inner.token_type.clone(),
            expiry: inner.expires_at,
        }
    }
}

impl From<Token> for SessionInner {
    fn from(token: Token) -> Self {
        Self {
            access_token: SecretString::from(token.access_token),
            refresh_token: token.refresh_token.map(SecretString::from),
            token_type: token.token_type,
            expires_at: token.expiry,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("oauth", &self.oauth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token_url: &str) -> OAuthConfig {
        OAuthConfig::new("client_1", "secret_1", "http://localhost:8080/auth/callback")
            .with_token_url(token_url)
    }

    #[tokio::test]
    async fn test_session_debug_redacts_token() {
        let session = Session::new(Token::bearer("super-secret-token"), None);
        let debug_str = format!("{:?}", session);
        assert!(!debug_str.contains("super-secret-token"));
        assert!(debug_str.contains("REDACTED"));
    }

    #[tokio::test]
    async fn test_unknown_expiry_is_never_expired() {
        let session = Session::new(Token::bearer("at"), None);
        assert!(!session.is_expired().await);
        assert!(!session.expires_within(Duration::hours(24)).await);
        assert!(!session.can_refresh().await);
    }

    #[tokio::test]
    async fn test_refresh_without_config_fails() {
        let session = Session::new(Token::bearer("at"), None);
        let err = session.refresh().await.unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[tokio::test]
    async fn test_refresh_exchanges_refresh_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth2/token")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
                mockito::Matcher::UrlEncoded("refresh_token".into(), "old-refresh".into()),
                mockito::Matcher::UrlEncoded("client_id".into(), "client_1".into()),
                mockito::Matcher::UrlEncoded("client_secret".into(), "secret_1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"access_token":"new-access","refresh_token":"new-refresh","token_type":"Bearer","expires_in":21600}"#,
            )
            .create_async()
            .await;

        let token = Token {
            access_token: "old-access".into(),
            refresh_token: Some("old-refresh".into()),
            token_type: "Bearer".into(),
            expiry: Some(Utc::now() - Duration::seconds(5)),
        };
        let session = Session::new(token, Some(config(&format!("{}/oauth2/token", server.url()))));
        assert!(session.is_expired().await);

        session.ensure_valid(Duration::seconds(60)).await.unwrap();
        mock.assert_async().await;

        let refreshed = session.token().await;
        assert_eq!(refreshed.access_token, "new-access");
        assert_eq!(refreshed.refresh_token.as_deref(), Some("new-refresh"));
        assert!(!session.is_expired().await);
    }

    #[tokio::test]
    async fn test_refresh_rejection_is_authentication_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/oauth2/token")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"invalid_grant"}"#)
            .create_async()
            .await;

        let token = Token {
            refresh_token: Some("stale".into()),
            ..Token::bearer("at")
        };
        let session = Session::new(token, Some(config(&format!("{}/oauth2/token", server.url()))));
        let err = session.refresh().await.unwrap_err();
        match err {
            Error::Authentication(message) => assert!(message.contains("invalid_grant")),
            other => panic!("expected authentication error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refresh_with_invalid_token_url_is_url_error() {
        let token = Token {
            refresh_token: Some("rt".into()),
            ..Token::bearer("at")
        };
        let session = Session::new(token, Some(config("not a url")));
        let err = session.refresh().await.unwrap_err();
        assert!(matches!(err, Error::UrlParse(_)));
    }
}
