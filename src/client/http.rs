//! HTTP client implementation for the Monzo API.

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

use crate::api::{
    AccountsService, AttachmentsService, BalancesService, FeedService, IdentityService,
    PotsService, ReceiptsService, TransactionsService, WebhooksService,
};
use crate::auth::{AuthorizedTransport, Session};
use crate::{Error, Result};

use super::config::ClientConfig;
use super::request::{Params, RequestBody, JSON_CONTENT_TYPE};
use super::transport::Transport;

/// The main client for interacting with the Monzo API.
///
/// This client provides access to all API services through method calls
/// that return service structs. Every call is one request and one response;
/// nothing is retried or cached.
///
/// # Example
///
/// ```no_run
/// use monzo_rs::{MonzoClient, ClientConfig, Session, Token};
///
/// # async fn example() -> monzo_rs::Result<()> {
/// let session = Session::new(Token::bearer("access-token"), None);
/// let client = MonzoClient::from_session(session, ClientConfig::default())?;
///
/// let accounts = client.accounts().list(None).await?;
/// if let Some(account) = accounts.first() {
///     let balance = client.balances().get(&account.id).await?;
///     println!("{} {}", balance.balance, balance.currency);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MonzoClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) config: ClientConfig,
}

impl MonzoClient {
    /// Create a client over a caller-supplied transport with default
    /// configuration.
    ///
    /// The transport is responsible for authentication.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Create a client over a caller-supplied transport and configuration.
    pub fn with_config(transport: impl Transport + 'static, config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport: Arc::new(transport),
                config,
            }),
        }
    }

    /// Create a client that authenticates with `session`, refreshing its
    /// token when it nears expiry.
    pub fn from_session(session: Session, config: ClientConfig) -> Result<Self> {
        let transport = AuthorizedTransport::new(session, &config)?;
        Ok(Self::with_config(transport, config))
    }

    /// Get the identity service (whoami, logout).
    pub fn identity(&self) -> IdentityService {
        IdentityService::new(self.inner.clone())
    }

    /// Get the accounts service.
    pub fn accounts(&self) -> AccountsService {
        AccountsService::new(self.inner.clone())
    }

    /// Get the balances service.
    pub fn balances(&self) -> BalancesService {
        BalancesService::new(self.inner.clone())
    }

    /// Get the pots service.
    pub fn pots(&self) -> PotsService {
        PotsService::new(self.inner.clone())
    }

    /// Get the transactions service.
    pub fn transactions(&self) -> TransactionsService {
        TransactionsService::new(self.inner.clone())
    }

    /// Get the feed service.
    pub fn feed(&self) -> FeedService {
        FeedService::new(self.inner.clone())
    }

    /// Get the attachments service.
    pub fn attachments(&self) -> AttachmentsService {
        AttachmentsService::new(self.inner.clone())
    }

    /// Get the receipts service.
    pub fn receipts(&self) -> ReceiptsService {
        ReceiptsService::new(self.inner.clone())
    }

    /// Get the webhooks service.
    pub fn webhooks(&self) -> WebhooksService {
        WebhooksService::new(self.inner.clone())
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl ClientInner {
    /// Resolve `path` and `query` against the configured base URL.
    fn url(&self, path: &str, query: &Params) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)?;
        url.set_path(path);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    /// Send one request and decode the JSON success body into `T`.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Params,
        body: RequestBody,
    ) -> Result<T> {
        let response = self.send(method, path, query, body).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Error::Decode)
    }

    /// Send one request and ignore the success body.
    pub(crate) async fn request_discard(
        &self,
        method: Method,
        path: &str,
        query: Params,
        body: RequestBody,
    ) -> Result<()> {
        self.send(method, path, query, body).await.map(drop)
    }

    /// Build, send and classify a request.
    ///
    /// Non-2xx responses become [`Error::Api`] with the body kept verbatim.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: Params,
        body: RequestBody,
    ) -> Result<reqwest::Response> {
        let url = self.url(path, &query)?;
        let mut request = reqwest::Request::new(method, url);

        let headers = request.headers_mut();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
        if let Some(content_type) = body.content_type() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        if let Some(bytes) = body.into_bytes() {
            *request.body_mut() = Some(bytes.into());
        }

        tracing::debug!(method = %request.method(), path, "sending request");
        let response = self.transport.execute(request).await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), path, "received response");

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

impl Clone for MonzoClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for MonzoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonzoClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner(base_url: &str) -> ClientInner {
        ClientInner {
            transport: Arc::new(reqwest::Client::new()),
            config: ClientConfig::default().with_base_url(base_url),
        }
    }

    #[test]
    fn test_url_without_query() {
        let url = inner("https://api.monzo.com")
            .url("/ping/whoami", &Params::new())
            .unwrap();
        assert_eq!(url.as_str(), "https://api.monzo.com/ping/whoami");
    }

    #[test]
    fn test_url_encodes_query() {
        let query = Params::new()
            .with("account_id", "acc_001")
            .with("expand[]", "merchant");
        let url = inner("http://127.0.0.1:8080/").url("/transactions", &query).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/transactions?account_id=acc_001&expand%5B%5D=merchant"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = inner("not a url").url("/accounts", &Params::new()).unwrap_err();
        assert!(matches!(err, Error::UrlParse(_)));
    }
}
