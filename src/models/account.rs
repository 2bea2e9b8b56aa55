//! Account and identity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::primitives::AccountId;

/// A Monzo account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier
    pub id: AccountId,
    /// User-visible description of the account
    #[serde(default)]
    pub description: String,
    /// When the account was created
    pub created: DateTime<Utc>,
    /// Account type tag, e.g. `uk_retail` or `uk_retail_joint`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}

/// Result of the `/ping/whoami` token check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmI {
    /// Whether the access token is valid
    pub authenticated: bool,
    /// OAuth client the token was issued to
    #[serde(default)]
    pub client_id: String,
    /// Monzo user the token belongs to
    #[serde(default)]
    pub user_id: String,
}
