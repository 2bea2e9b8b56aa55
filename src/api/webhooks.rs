//! Webhooks service.

use std::sync::Arc;

use reqwest::Method;

use crate::api::require_id;
use crate::client::request::{Empty, Params, RequestBody};
use crate::client::ClientInner;
use crate::models::{AccountId, Webhook, WebhookId};
use crate::Result;

/// Service for managing webhook registrations.
///
/// Parsing the deliveries themselves is done by [`crate::webhook`].
pub struct WebhooksService {
    inner: Arc<ClientInner>,
}

impl WebhooksService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Register `url` to receive events for an account.
    pub async fn register(&self, account_id: &AccountId, url: &str) -> Result<Webhook> {
        #[derive(serde::Deserialize)]
        struct Response {
            webhook: Webhook,
        }

        let form = Params::new()
            .with("account_id", account_id.as_str())
            .with("url", url);
        let response: Response = self
            .inner
            .request(Method::POST, "/webhooks", Params::new(), RequestBody::Form(form))
            .await?;
        Ok(response.webhook)
    }

    /// List the webhooks registered for an account.
    pub async fn list(&self, account_id: &AccountId) -> Result<Vec<Webhook>> {
        #[derive(serde::Deserialize)]
        struct Response {
            webhooks: Vec<Webhook>,
        }

        let query = Params::new().with("account_id", account_id.as_str());
        let response: Response = self
            .inner
            .request(Method::GET, "/webhooks", query, RequestBody::Empty)
            .await?;
        Ok(response.webhooks)
    }

    /// Delete a webhook registration.
    pub async fn delete(&self, webhook_id: &WebhookId) -> Result<()> {
        require_id("webhook", webhook_id.as_str())?;
        let _: Empty = self
            .inner
            .request(
                Method::DELETE,
                &format!("/webhooks/{}", webhook_id),
                Params::new(),
                RequestBody::Empty,
            )
            .await?;
        Ok(())
    }
}
