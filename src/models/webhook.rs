//! Webhook registration model.

use serde::{Deserialize, Serialize};

use super::primitives::{AccountId, WebhookId};

/// A registered webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    /// Unique webhook identifier
    pub id: WebhookId,
    /// Account whose events are delivered
    pub account_id: AccountId,
    /// Destination URL
    pub url: String,
}
