//! Attachment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::primitives::AttachmentId;

/// A file attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Unique attachment identifier
    pub id: AttachmentId,
    /// User who owns the attachment
    #[serde(default)]
    pub user_id: String,
    /// Transaction the attachment is linked to
    pub external_id: String,
    /// Where the file is hosted
    pub file_url: String,
    /// MIME type, e.g. `image/png`
    pub file_type: String,
    /// When the attachment was registered
    pub created: DateTime<Utc>,
}

/// Upload target returned by `/attachment/upload`.
///
/// The file bytes go to `upload_url`; `file_url` is then passed to
/// [`AttachmentsService::register`](crate::api::AttachmentsService::register).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSlot {
    /// Permanent URL of the file once uploaded
    pub file_url: String,
    /// Temporary pre-signed URL to send the file to
    pub upload_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_attachment() {
        let json = r#"{
            "id": "attach_00009238aOAIvVqfb9LrZh",
            "user_id": "user_00009238aMBIIrS5Rdncq9",
            "external_id": "tx_00008zIcpb1TB4yeIFXMzx",
            "file_url": "https://s3-eu-west-1.amazonaws.com/mondo-image-uploads/user_00009237hliZellUicKuG1/LcCu4ogv1xW28OCcvOTL-foo.png",
            "file_type": "image/png",
            "created": "2015-11-12T18:37:02Z"
        }"#;

        let attachment: Attachment = serde_json::from_str(json).unwrap();
        assert_eq!(attachment.id.as_str(), "attach_00009238aOAIvVqfb9LrZh");
        assert_eq!(attachment.file_type, "image/png");
    }
}
