//! Three-legged OAuth2 authorization against Monzo.

use std::sync::{Arc, Mutex, PoisonError};

use oauth2::{AuthorizationCode, CsrfToken};
use serde::Deserialize;
use tokio::sync::oneshot;
use url::Url;

use crate::{Error, Result};

use super::token::{token_error, OAuthConfig, Token};

/// Query parameters Monzo appends to the redirect URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    /// Authorization code to exchange
    #[serde(default)]
    pub code: String,
    /// State token echoed back
    #[serde(default)]
    pub state: String,
    /// Set by the provider when the user denied access
    #[serde(default)]
    pub error: Option<String>,
}

type CodeSender = oneshot::Sender<Result<String>>;

/// One authorization attempt.
///
/// Each flow owns a random state token, so concurrent logins never share
/// state. Complete it either directly with [`finish`](Self::finish), or
/// hand a [`CallbackHandle`] to an HTTP handler and [`wait`](Self::wait).
///
/// # Example
///
/// ```no_run
/// # async fn example(params: monzo_rs::auth::CallbackParams) -> monzo_rs::Result<()> {
/// use monzo_rs::{AuthorizationFlow, OAuthConfig};
///
/// let config = OAuthConfig::new("client", "secret", "http://localhost:8080/auth/callback");
/// let flow = AuthorizationFlow::new(config);
/// println!("Log in at {}", flow.authorize_url()?);
///
/// // ... later, with the query parameters of the redirect ...
/// let token = flow.finish(&params).await?;
/// # Ok(())
/// # }
/// ```
pub struct AuthorizationFlow {
    config: OAuthConfig,
    state: CsrfToken,
    http: reqwest::Client,
    sender: Arc<Mutex<Option<CodeSender>>>,
    receiver: oneshot::Receiver<Result<String>>,
}

impl AuthorizationFlow {
    /// Start a flow with a fresh 128-bit state token.
    pub fn new(config: OAuthConfig) -> Self {
        let state = CsrfToken::new_random();
        let (sender, receiver) = oneshot::channel();
        Self {
            config,
            state,
            http: reqwest::Client::new(),
            sender: Arc::new(Mutex::new(Some(sender))),
            receiver,
        }
    }

    /// Use `http` for the code exchange.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// The state token the redirect must echo back.
    pub fn state(&self) -> &str {
        self.state.secret()
    }

    /// The page to send the user to.
    pub fn authorize_url(&self) -> Result<Url> {
        let (url, _) = self
            .config
            .client()?
            .authorize_url(|| self.state.clone())
            .url();
        Ok(url)
    }

    /// Validate the redirect parameters and exchange the code for a token.
    pub async fn finish(self, params: &CallbackParams) -> Result<Token> {
        let code = validate(self.state(), params)?;
        exchange(&self.http, &self.config, code).await
    }

    /// A handle an HTTP callback handler can complete this flow with.
    pub fn callback_handle(&self) -> CallbackHandle {
        CallbackHandle {
            state: self.state().to_string(),
            sender: self.sender.clone(),
        }
    }

    /// Wait for a [`CallbackHandle`] to complete, then exchange the code.
    ///
    /// Fails if every handle is dropped without completing.
    pub async fn wait(self) -> Result<Token> {
        let AuthorizationFlow {
            config,
            http,
            sender,
            receiver,
            ..
        } = self;
        // Only the handles keep the sender alive from here on.
        drop(sender);

        let code = receiver.await.map_err(|_| {
            Error::Authentication("authorization flow abandoned before callback".to_string())
        })??;
        exchange(&http, &config, code).await
    }
}

async fn exchange(http: &reqwest::Client, config: &OAuthConfig, code: String) -> Result<Token> {
    let response = config
        .client()?
        .exchange_code(AuthorizationCode::new(code))
        .request_async(http)
        .await
        .map_err(token_error)?;
    tracing::info!("authorization code exchanged for token");
    Ok(Token::from_response(&response))
}

impl std::fmt::Debug for AuthorizationFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationFlow")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

/// Completes an [`AuthorizationFlow`] from an HTTP callback handler.
///
/// Cloneable, but only the first completion counts.
#[derive(Debug, Clone)]
pub struct CallbackHandle {
    state: String,
    sender: Arc<Mutex<Option<CodeSender>>>,
}

impl CallbackHandle {
    /// Validate the redirect and resolve the waiting flow.
    ///
    /// A validation failure is both returned and delivered to the flow, so
    /// the handler can render it while [`AuthorizationFlow::wait`] fails too.
    pub fn complete(&self, params: &CallbackParams) -> Result<()> {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| Error::Authentication("authorization already completed".to_string()))?;

        match validate(&self.state, params) {
            Ok(code) => {
                // The flow may already be gone; nothing left to notify then.
                let _ = sender.send(Ok(code));
                Ok(())
            }
            Err(err) => {
                let _ = sender.send(Err(Error::Authentication(err.to_string())));
                Err(err)
            }
        }
    }
}

fn validate(expected_state: &str, params: &CallbackParams) -> Result<String> {
    if params.state != expected_state {
        tracing::warn!("authorization callback with mismatched state");
        return Err(Error::Authentication("invalid state token".to_string()));
    }
    if let Some(error) = params.error.as_deref().filter(|e| !e.is_empty()) {
        return Err(Error::Authentication(format!("authorization denied: {error}")));
    }
    if params.code.is_empty() {
        return Err(Error::Authentication("no code returned".to_string()));
    }
    Ok(params.code.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OAuthConfig {
        OAuthConfig::new("client_1", "secret_1", "http://localhost:8080/auth/callback")
    }

    fn params(flow: &AuthorizationFlow, code: &str) -> CallbackParams {
        CallbackParams {
            code: code.to_string(),
            state: flow.state().to_string(),
            error: None,
        }
    }

    #[test]
    fn test_state_is_random_url_safe() {
        let a = AuthorizationFlow::new(config());
        let b = AuthorizationFlow::new(config());
        // 16 random bytes, base64url without padding.
        assert_eq!(a.state().len(), 22);
        assert!(a
            .state()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(a.state(), b.state());
    }

    #[test]
    fn test_authorize_url() {
        let flow = AuthorizationFlow::new(config());
        let url = flow.authorize_url().unwrap();
        assert_eq!(url.host_str(), Some("auth.monzo.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("client_id".into(), "client_1".into())));
        assert!(pairs.contains(&(
            "redirect_uri".into(),
            "http://localhost:8080/auth/callback".into()
        )));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&("state".into(), flow.state().into())));
    }

    #[test]
    fn test_authorize_url_rejects_invalid_auth_url() {
        let flow = AuthorizationFlow::new(config().with_auth_url("not a url"));
        assert!(matches!(flow.authorize_url().unwrap_err(), Error::UrlParse(_)));
    }

    #[tokio::test]
    async fn test_finish_rejects_wrong_state() {
        let flow = AuthorizationFlow::new(config());
        let bad = CallbackParams {
            code: "code".into(),
            state: "forged".into(),
            error: None,
        };
        let err = flow.finish(&bad).await.unwrap_err();
        assert_eq!(err.to_string(), "Authentication failed: invalid state token");
    }

    #[tokio::test]
    async fn test_finish_rejects_missing_code() {
        let flow = AuthorizationFlow::new(config());
        let p = params(&flow, "");
        let err = flow.finish(&p).await.unwrap_err();
        assert!(err.to_string().contains("no code returned"));
    }

    #[tokio::test]
    async fn test_finish_rejects_provider_error() {
        let flow = AuthorizationFlow::new(config());
        let mut p = params(&flow, "");
        p.error = Some("access_denied".into());
        let err = flow.finish(&p).await.unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }

    #[tokio::test]
    async fn test_handle_completes_once() {
        let flow = AuthorizationFlow::new(config());
        let handle = flow.callback_handle();
        let p = params(&flow, "");
        assert!(handle.complete(&p).is_err());
        let err = handle.complete(&p).unwrap_err();
        assert!(err.to_string().contains("already completed"));

        let err = flow.wait().await.unwrap_err();
        assert!(err.to_string().contains("no code returned"));
    }

    #[tokio::test]
    async fn test_wait_fails_when_handles_dropped() {
        let flow = AuthorizationFlow::new(config());
        drop(flow.callback_handle());
        assert!(matches!(
            flow.wait().await.unwrap_err(),
            Error::Authentication(_)
        ));
    }

    #[tokio::test]
    async fn test_wait_exchanges_code() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth2/token")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                mockito::Matcher::UrlEncoded("client_id".into(), "client_1".into()),
                mockito::Matcher::UrlEncoded("client_secret".into(), "secret_1".into()),
                mockito::Matcher::UrlEncoded("code".into(), "auth-code".into()),
                mockito::Matcher::UrlEncoded(
                    "redirect_uri".into(),
                    "http://localhost:8080/auth/callback".into(),
                ),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"at","refresh_token":"rt","token_type":"Bearer","expires_in":3600}"#)
            .create_async()
            .await;

        let flow = AuthorizationFlow::new(
            config().with_token_url(format!("{}/oauth2/token", server.url())),
        );
        let handle = flow.callback_handle();
        let p = params(&flow, "auth-code");
        let waiter = tokio::spawn(flow.wait());
        handle.complete(&p).unwrap();

        let token = waiter.await.unwrap().unwrap();
        mock.assert_async().await;
        assert_eq!(token.access_token, "at");
        assert_eq!(token.refresh_token.as_deref(), Some("rt"));
    }
}
