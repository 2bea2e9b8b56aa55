//! Attachments service.

use std::sync::Arc;

use reqwest::Method;

use crate::api::require_id;
use crate::client::request::{Empty, Params, RequestBody};
use crate::client::ClientInner;
use crate::models::{Attachment, AttachmentId, TransactionId, UploadSlot};
use crate::Result;

/// Service for attaching files to transactions.
///
/// Attaching is a two-step dance: [`upload`](Self::upload) hands out a
/// temporary upload URL, the caller sends the file there, then
/// [`register`](Self::register) links the hosted file to a transaction.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: monzo_rs::MonzoClient) -> monzo_rs::Result<()> {
/// use monzo_rs::TransactionId;
///
/// let slot = client.attachments().upload("receipt.png", "image/png", 5120).await?;
/// // ... PUT the file bytes to slot.upload_url ...
/// let attachment = client
///     .attachments()
///     .register(&TransactionId::new("tx_001"), &slot.file_url, "image/png")
///     .await?;
/// println!("Attached {}", attachment.id);
/// # Ok(())
/// # }
/// ```
pub struct AttachmentsService {
    inner: Arc<ClientInner>,
}

impl AttachmentsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Request a temporary URL to upload a file to.
    pub async fn upload(
        &self,
        file_name: &str,
        file_type: &str,
        content_length: u64,
    ) -> Result<UploadSlot> {
        let form = Params::new()
            .with("file_name", file_name)
            .with("file_type", file_type)
            .with("content_length", content_length.to_string());

        self.inner
            .request(
                Method::POST,
                "/attachment/upload",
                Params::new(),
                RequestBody::Form(form),
            )
            .await
    }

    /// Link a hosted file to a transaction.
    pub async fn register(
        &self,
        transaction_id: &TransactionId,
        file_url: &str,
        file_type: &str,
    ) -> Result<Attachment> {
        #[derive(serde::Deserialize)]
        struct Response {
            attachment: Attachment,
        }

        let form = Params::new()
            .with("external_id", transaction_id.as_str())
            .with("file_url", file_url)
            .with("file_type", file_type);

        let response: Response = self
            .inner
            .request(
                Method::POST,
                "/attachment/register",
                Params::new(),
                RequestBody::Form(form),
            )
            .await?;
        Ok(response.attachment)
    }

    /// Remove an attachment from its transaction.
    pub async fn deregister(&self, attachment_id: &AttachmentId) -> Result<()> {
        require_id("attachment", attachment_id.as_str())?;
        let form = Params::new().with("id", attachment_id.as_str());
        let _: Empty = self
            .inner
            .request(
                Method::POST,
                "/attachment/deregister",
                Params::new(),
                RequestBody::Form(form),
            )
            .await?;
        Ok(())
    }
}
