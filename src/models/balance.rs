//! Balance and pot models.
//!
//! All amounts are integer minor units (pence for GBP).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::primitives::PotId;

/// Balance of a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Available balance in minor units
    pub balance: i64,
    /// Balance including all pots, in minor units
    #[serde(default)]
    pub total_balance: i64,
    /// ISO 4217 currency code
    pub currency: String,
    /// Amount spent today, in minor units
    #[serde(default)]
    pub spend_today: i64,
}

/// A savings pot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    /// Unique pot identifier
    pub id: PotId,
    /// User-chosen name
    pub name: String,
    /// Visual style, e.g. `beach_ball`
    #[serde(default)]
    pub style: String,
    /// Current balance in minor units
    pub balance: i64,
    /// ISO 4217 currency code
    pub currency: String,
    /// When the pot was created
    pub created: DateTime<Utc>,
    /// When the pot was last updated
    pub updated: DateTime<Utc>,
    /// Whether the pot has been deleted
    #[serde(default)]
    pub deleted: bool,
}
