//! OAuth2 tokens and the client registration.

use chrono::{DateTime, Duration, Utc};
use oauth2::basic::{BasicClient, BasicErrorResponse, BasicTokenResponse, BasicTokenType};
use oauth2::{
    AuthType, AuthUrl, ClientId, ClientSecret, EndpointNotSet, EndpointSet, RedirectUrl,
    RequestTokenError, TokenResponse, TokenUrl,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::models::{AUTH_URL, TOKEN_URL};
use crate::{Error, Result};

/// OAuth2 client with the authorization and token endpoints set.
pub(crate) type OAuthClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// OAuth2 client registration.
///
/// # Example
///
/// ```
/// use monzo_rs::OAuthConfig;
///
/// let config = OAuthConfig::new(
///     "oauth2client_123",
///     "mnzconf.secret",
///     "http://localhost:8080/auth/callback",
/// );
/// assert_eq!(config.token_url, "https://api.monzo.com/oauth2/token");
/// ```
#[derive(Clone)]
pub struct OAuthConfig {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: SecretString,
    /// Redirect URI registered with the client
    pub redirect_url: String,
    /// Authorization page users are sent to
    pub auth_url: String,
    /// Token endpoint for code exchange and refresh
    pub token_url: String,
}

impl OAuthConfig {
    /// Configuration against Monzo's production endpoints.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            redirect_url: redirect_url.into(),
            auth_url: AUTH_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
        }
    }

    /// Override the authorization page URL.
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    /// Override the token endpoint URL.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Build the OAuth2 client for this registration.
    ///
    /// Monzo expects the client credentials in the form body rather than a
    /// Basic authorization header.
    pub(crate) fn client(&self) -> Result<OAuthClient> {
        Ok(BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(
                self.client_secret.expose_secret().to_string(),
            ))
            .set_auth_uri(AuthUrl::new(self.auth_url.clone())?)
            .set_token_uri(TokenUrl::new(self.token_url.clone())?)
            .set_redirect_uri(RedirectUrl::new(self.redirect_url.clone())?)
            .set_auth_type(AuthType::RequestBody))
    }
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_url", &self.redirect_url)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .finish()
    }
}

/// An OAuth2 token as issued by Monzo.
///
/// Serializable so callers can persist it between runs. Storing it safely
/// is the caller's responsibility.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Bearer access token
    pub access_token: String,
    /// Refresh token, absent for non-confidential clients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token type, always `Bearer` in practice
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// When the access token expires, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    /// A bare access token with no refresh token and unknown expiry.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            token_type: default_token_type(),
            expiry: None,
        }
    }

    /// Returns `true` if the expiry is known and has passed.
    pub fn is_expired(&self) -> bool {
        self.expiry.is_some_and(|expiry| Utc::now() >= expiry)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("token_type", &self.token_type)
            .field("expiry", &self.expiry)
            .finish()
    }
}

impl Token {
    /// Convert a token endpoint response, stamping the expiry from `expires_in`.
    pub(crate) fn from_response(response: &BasicTokenResponse) -> Self {
        let token_type = match response.token_type() {
            BasicTokenType::Bearer => default_token_type(),
            BasicTokenType::Mac => "MAC".to_string(),
            BasicTokenType::Extension(other) => other.clone(),
        };
        Self {
            access_token: response.access_token().secret().to_string(),
            refresh_token: response.refresh_token().map(|t| t.secret().to_string()),
            token_type,
            expiry: response
                .expires_in()
                .and_then(|d| Duration::from_std(d).ok())
                .map(|d| Utc::now() + d),
        }
    }
}

/// Map a failed token request onto [`Error::Authentication`].
pub(crate) fn token_error<RE>(err: RequestTokenError<RE, BasicErrorResponse>) -> Error
where
    RE: std::error::Error + 'static,
{
    match err {
        RequestTokenError::ServerResponse(response) => {
            Error::Authentication(format!("token request rejected: {response}"))
        }
        other => Error::Authentication(format!("token request failed: {other}")),
    }
}
