//! Transport that signs requests with a session's bearer token.

use reqwest::header::{HeaderValue, AUTHORIZATION};
use secrecy::ExposeSecret;

use crate::client::{BoxFuture, ClientConfig, Transport};
use crate::{Error, Result};

use super::session::Session;

/// [`Transport`] that attaches `Authorization: Bearer <token>` to every
/// request, refreshing the session first when its token nears expiry.
#[derive(Debug, Clone)]
pub struct AuthorizedTransport {
    session: Session,
    http: reqwest::Client,
    refresh_buffer: chrono::Duration,
}

impl AuthorizedTransport {
    /// Build the underlying HTTP client from `config`.
    pub fn new(session: Session, config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self::with_http_client(session, http, config))
    }

    /// Use a caller-built HTTP client.
    pub fn with_http_client(session: Session, http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            session,
            http,
            refresh_buffer: chrono::Duration::seconds(config.refresh_buffer_secs),
        }
    }

    /// The session requests are signed with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    async fn send(&self, mut request: reqwest::Request) -> Result<reqwest::Response> {
        self.session.ensure_valid(self.refresh_buffer).await?;

        let token = self.session.access_token().await;
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::InvalidInput("access token is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);

        Ok(self.http.execute(request).await?)
    }
}

impl Transport for AuthorizedTransport {
    fn execute(&self, request: reqwest::Request) -> BoxFuture<'_, Result<reqwest::Response>> {
        Box::pin(self.send(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Token;

    #[tokio::test]
    async fn test_rejects_token_with_newline() {
        let session = Session::new(Token::bearer("bad\ntoken"), None);
        let transport = AuthorizedTransport::new(session, &ClientConfig::default()).unwrap();
        let request = reqwest::Request::new(
            reqwest::Method::GET,
            url::Url::parse("http://127.0.0.1:1/ping/whoami").unwrap(),
        );
        let err = transport.execute(request).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_refreshes_through_session_before_sending() {
        let token = Token {
            refresh_token: Some("rt".into()),
            expiry: Some(chrono::Utc::now() + chrono::Duration::seconds(10)),
            ..Token::bearer("at")
        };
        let oauth = crate::auth::OAuthConfig::new("client", "secret", "http://localhost/cb")
            .with_token_url("not a url");
        let session = Session::new(token, Some(oauth));
        let transport = AuthorizedTransport::new(session, &ClientConfig::default()).unwrap();
        let request = reqwest::Request::new(
            reqwest::Method::GET,
            url::Url::parse("http://127.0.0.1:1/ping/whoami").unwrap(),
        );
        // The refresh attempt fails on the token URL before anything is sent.
        let err = transport.execute(request).await.unwrap_err();
        assert!(matches!(err, Error::UrlParse(_)));
    }
}
