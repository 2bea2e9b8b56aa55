//! Transaction and merchant models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::primitives::{AccountId, TransactionId};

/// A single card payment, transfer or top-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Account the transaction belongs to
    pub account_id: AccountId,
    /// Amount in minor units; negative for debits
    pub amount: i64,
    /// When the transaction was created
    pub created: DateTime<Utc>,
    /// ISO 4217 currency code
    pub currency: String,
    /// Statement description
    #[serde(default)]
    pub description: String,
    /// Unique transaction identifier
    pub id: TransactionId,
    /// Merchant, either as a bare id or expanded
    #[serde(default)]
    pub merchant: MerchantRef,
    /// Free-form key/value annotations
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// User-entered notes
    #[serde(default)]
    pub notes: String,
    /// Whether this is a top-up
    #[serde(default)]
    pub is_load: bool,
    /// Settlement time; absent while the transaction is pending
    #[serde(default, deserialize_with = "timestamp_or_empty")]
    pub settled: Option<DateTime<Utc>>,
    /// Spending category, e.g. `eating_out`
    #[serde(default)]
    pub category: String,
    /// Why the transaction was declined, if it was
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decline_reason: Option<String>,
}

impl Transaction {
    /// The merchant id, when the merchant field is a bare identifier.
    pub fn merchant_id(&self) -> Option<&str> {
        self.merchant.id()
    }

    /// The merchant record, when the merchant field was expanded.
    pub fn expanded_merchant(&self) -> Option<&Merchant> {
        self.merchant.expanded()
    }

    /// Returns `true` once the transaction has settled.
    pub fn is_settled(&self) -> bool {
        self.settled.is_some()
    }
}

/// The two shapes of a transaction's `merchant` field.
///
/// Monzo sends a bare merchant id unless `expand[]=merchant` was requested,
/// in which case the full record is embedded. The shape is resolved once,
/// at decode time.
#[derive(Debug, Clone, PartialEq)]
pub enum MerchantRef {
    /// Bare merchant identifier
    Id(String),
    /// Embedded merchant record
    Expanded(Box<Merchant>),
    /// Null, absent, or a value matching neither shape
    Unresolved(Value),
}

impl MerchantRef {
    /// Classify a raw `merchant` value.
    ///
    /// An object only counts as expanded if it carries a non-empty id, so
    /// `{}` and `null` never resolve to a merchant.
    pub fn resolve(raw: Value) -> Self {
        match raw {
            Value::String(id) => MerchantRef::Id(id),
            Value::Object(_) => match serde_json::from_value::<Merchant>(raw.clone()) {
                Ok(merchant) if !merchant.id.is_empty() => {
                    MerchantRef::Expanded(Box::new(merchant))
                }
                _ => MerchantRef::Unresolved(raw),
            },
            other => MerchantRef::Unresolved(other),
        }
    }

    /// The bare merchant id, if this is the identifier shape.
    pub fn id(&self) -> Option<&str> {
        match self {
            MerchantRef::Id(id) => Some(id),
            _ => None,
        }
    }

    /// The embedded record, if this is the expanded shape.
    pub fn expanded(&self) -> Option<&Merchant> {
        match self {
            MerchantRef::Expanded(merchant) => Some(merchant),
            _ => None,
        }
    }
}

impl Default for MerchantRef {
    fn default() -> Self {
        MerchantRef::Unresolved(Value::Null)
    }
}

impl<'de> Deserialize<'de> for MerchantRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(MerchantRef::resolve)
    }
}

impl Serialize for MerchantRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MerchantRef::Id(id) => serializer.serialize_str(id),
            MerchantRef::Expanded(merchant) => merchant.serialize(serializer),
            MerchantRef::Unresolved(raw) => raw.serialize(serializer),
        }
    }
}

/// A merchant as embedded in an expanded transaction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Merchant {
    /// Merchant address
    pub address: Address,
    /// When the merchant was first seen
    pub created: Option<DateTime<Utc>>,
    /// Merchant group identifier
    pub group_id: String,
    /// Unique merchant identifier
    pub id: String,
    /// Logo URL
    pub logo: String,
    /// Emoji shown next to the merchant
    pub emoji: String,
    /// Merchant name
    pub name: String,
    /// Default category
    pub category: String,
}

/// A physical address.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Country code
    pub country: String,
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
    /// Postal code
    pub postcode: String,
    /// Region or state
    pub region: String,
}

/// Pagination parameters for transaction listing.
///
/// Values are forwarded verbatim. A `limit` of zero or less and empty
/// `since`/`before` markers are left out of the query.
///
/// # Example
///
/// ```
/// use monzo_rs::models::Pagination;
///
/// let page = Pagination::new().limit(50).since("2025-01-01T00:00:00Z");
/// assert_eq!(page.limit, 50);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Maximum number of results (Monzo caps this at 100)
    pub limit: i32,
    /// RFC 3339 timestamp or transaction id to start after
    pub since: String,
    /// RFC 3339 timestamp to end before
    pub before: String,
}

impl Pagination {
    /// Empty pagination (server defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size limit.
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = limit;
        self
    }

    /// Set the start marker.
    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = since.into();
        self
    }

    /// Set the end marker.
    pub fn before(mut self, before: impl Into<String>) -> Self {
        self.before = before.into();
        self
    }
}

/// Monzo sends `""` for the settlement time of pending transactions.
pub(crate) fn timestamp_or_empty<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}
