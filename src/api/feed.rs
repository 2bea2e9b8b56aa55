//! Feed service.

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::Method;

use crate::client::request::{Empty, Params, RequestBody};
use crate::client::ClientInner;
use crate::models::AccountId;
use crate::Result;

/// A feed item to push into the user's Monzo feed.
///
/// # Example
///
/// ```
/// use monzo_rs::api::FeedItem;
///
/// let item = FeedItem::basic("Budget alert", "https://example.com/icon.png")
///     .body("You have spent 80% of your eating-out budget")
///     .url("https://example.com/budget");
/// assert_eq!(item.item_type, "basic");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    /// Item type; Monzo currently accepts only `basic`
    pub item_type: String,
    /// Opened when the user taps the item
    pub url: Option<String>,
    /// Item parameters such as `title`, `image_url`, `body`
    pub params: BTreeMap<String, String>,
}

impl FeedItem {
    /// A `basic` item with the two required parameters.
    pub fn basic(title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            item_type: "basic".to_string(),
            ..Default::default()
        }
        .param("title", title)
        .param("image_url", image_url)
    }

    /// Set the item body text.
    pub fn body(self, body: impl Into<String>) -> Self {
        self.param("body", body)
    }

    /// Set the URL opened on tap.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set any other item parameter, e.g. `background_color`.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    fn to_form(&self, account_id: &AccountId) -> Params {
        let mut form = Params::new()
            .with("account_id", account_id.as_str())
            .with("type", self.item_type.as_str());
        if let Some(url) = &self.url {
            form.push_non_empty("url", url);
        }
        for (key, value) in &self.params {
            form.push(format!("params[{key}]"), value.as_str());
        }
        form
    }
}

/// Service for creating feed items.
pub struct FeedService {
    inner: Arc<ClientInner>,
}

impl FeedService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Push an item into an account's feed.
    pub async fn create(&self, account_id: &AccountId, item: &FeedItem) -> Result<()> {
        let _: Empty = self
            .inner
            .request(
                Method::POST,
                "/feed",
                Params::new(),
                RequestBody::Form(item.to_form(account_id)),
            )
            .await?;
        Ok(())
    }
}
