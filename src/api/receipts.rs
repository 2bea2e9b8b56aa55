//! Receipts service.

use std::sync::Arc;

use reqwest::Method;

use crate::client::request::{Empty, Params, RequestBody};
use crate::client::ClientInner;
use crate::models::Receipt;
use crate::Result;

/// Service for itemised transaction receipts.
///
/// Receipts are keyed by the caller's `external_id`; writing the same
/// `external_id` again replaces the receipt.
pub struct ReceiptsService {
    inner: Arc<ClientInner>,
}

impl ReceiptsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Create or replace a receipt. Sent as a JSON body.
    pub async fn create(&self, receipt: &Receipt) -> Result<Receipt> {
        self.inner
            .request(
                Method::PUT,
                "/transaction-receipts",
                Params::new(),
                RequestBody::json(receipt)?,
            )
            .await
    }

    /// Fetch a receipt by its external id.
    pub async fn get(&self, external_id: &str) -> Result<Receipt> {
        #[derive(serde::Deserialize)]
        struct Response {
            receipt: Receipt,
        }

        let query = Params::new().with("external_id", external_id);
        let response: Response = self
            .inner
            .request(Method::GET, "/transaction-receipts", query, RequestBody::Empty)
            .await?;
        Ok(response.receipt)
    }

    /// Delete a receipt by its external id.
    pub async fn delete(&self, external_id: &str) -> Result<()> {
        let query = Params::new().with("external_id", external_id);
        let _: Empty = self
            .inner
            .request(Method::DELETE, "/transaction-receipts", query, RequestBody::Empty)
            .await?;
        Ok(())
    }
}
