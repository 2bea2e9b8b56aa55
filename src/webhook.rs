//! Validation of inbound webhook deliveries.
//!
//! Monzo posts events as `{"type": "...", "data": {...}}`. Only
//! `transaction.created` is understood here. Decoding is strict: unknown
//! fields in the envelope or in the transaction are rejected.
//!
//! Strict decoding means a field Monzo adds in the future will cause
//! deliveries to be rejected until this crate learns about it. Callers that
//! prefer leniency can decode [`Transaction`] themselves.
//!
//! # Example
//!
//! ```
//! use monzo_rs::webhook::parse_transaction_created;
//!
//! let body = br#"{
//!     "type": "transaction.created",
//!     "data": {
//!         "account_id": "acc_001",
//!         "amount": -350,
//!         "created": "2015-09-04T14:28:40Z",
//!         "currency": "GBP",
//!         "description": "Ozone Coffee Roasters",
//!         "id": "tx_001",
//!         "merchant": "merch_001"
//!     }
//! }"#;
//!
//! let transaction = parse_transaction_created(body).unwrap();
//! assert_eq!(transaction.amount, -350);
//! assert_eq!(transaction.merchant_id(), Some("merch_001"));
//! ```

use std::collections::HashMap;
use std::io::Read;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::WebhookError;
use crate::models::transaction::timestamp_or_empty;
use crate::models::{AccountId, MerchantRef, Transaction, TransactionId};

/// Largest body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// The only event type accepted.
pub const TRANSACTION_CREATED: &str = "transaction.created";

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: Value,
}

/// Strict twin of [`Transaction`]; kept private so ordinary API responses
/// stay lenient.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TransactionPayload {
    account_id: AccountId,
    amount: i64,
    created: DateTime<Utc>,
    currency: String,
    #[serde(default)]
    description: String,
    id: TransactionId,
    #[serde(default)]
    merchant: MerchantRef,
    #[serde(default)]
    metadata: HashMap<String, String>,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    is_load: bool,
    #[serde(default, deserialize_with = "timestamp_or_empty")]
    settled: Option<DateTime<Utc>>,
    #[serde(default)]
    category: String,
    #[serde(default)]
    decline_reason: Option<String>,
}

impl From<TransactionPayload> for Transaction {
    fn from(p: TransactionPayload) -> Self {
        Transaction {
            account_id: p.account_id,
            amount: p.amount,
            created: p.created,
            currency: p.currency,
            description: p.description,
            id: p.id,
            merchant: p.merchant,
            metadata: p.metadata,
            notes: p.notes,
            is_load: p.is_load,
            settled: p.settled,
            category: p.category,
            decline_reason: p.decline_reason,
        }
    }
}

/// Validate a `transaction.created` delivery and return its transaction.
///
/// # Errors
///
/// - [`WebhookError::TooLarge`] if `body` exceeds [`MAX_BODY_BYTES`]
/// - [`WebhookError::Malformed`] for invalid JSON or unknown fields
/// - [`WebhookError::UnexpectedType`] for any other event type
pub fn parse_transaction_created(body: &[u8]) -> Result<Transaction, WebhookError> {
    if body.len() > MAX_BODY_BYTES {
        return Err(WebhookError::TooLarge {
            limit: MAX_BODY_BYTES,
        });
    }

    let envelope: Envelope = serde_json::from_slice(body).map_err(WebhookError::Malformed)?;
    if envelope.event_type != TRANSACTION_CREATED {
        return Err(WebhookError::UnexpectedType(envelope.event_type));
    }

    let payload: TransactionPayload =
        serde_json::from_value(envelope.data).map_err(WebhookError::Malformed)?;
    Ok(payload.into())
}

/// Like [`parse_transaction_created`], reading the body from `reader`.
///
/// At most [`MAX_BODY_BYTES`] + 1 bytes are read, so an oversized body is
/// never buffered in full.
pub fn parse_transaction_created_reader<R: Read>(reader: R) -> Result<Transaction, WebhookError> {
    let mut body = Vec::new();
    reader
        .take(MAX_BODY_BYTES as u64 + 1)
        .read_to_end(&mut body)?;
    parse_transaction_created(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELIVERY: &str = r#"
    {
        "type": "transaction.created",
        "data": {
            "account_id": "acc_00008gju41AHyfLUzBUk8A",
            "amount": -350,
            "created": "2015-09-04T14:28:40Z",
            "currency": "GBP",
            "description": "Ozone Coffee Roasters",
            "id": "tx_00008zjky19HyFLAzlUk7t",
            "category": "eating_out",
            "is_load": false,
            "settled": "2015-09-05T14:28:40Z",
            "merchant": {
                "id": "merch_00008zIcpbAKe8shBxXUtl",
                "group_id": "grp_00008zIcpbBOaAr7TTP3sv",
                "name": "The De Beauvoir Deli Co.",
                "category": "eating_out",
                "address": {},
                "created": "2015-08-22T12:20:18Z",
                "logo": "",
                "emoji": ""
            }
        }
    }"#;

    #[test]
    fn test_parses_transaction_created() {
        let tx = parse_transaction_created(DELIVERY.as_bytes()).unwrap();
        assert_eq!(tx.account_id.as_str(), "acc_00008gju41AHyfLUzBUk8A");
        assert_eq!(tx.id.as_str(), "tx_00008zjky19HyFLAzlUk7t");
        assert_eq!(tx.amount, -350);
        assert!(tx.is_settled());

        let merchant = tx.expanded_merchant().expect("merchant should be expanded");
        assert_eq!(merchant.name, "The De Beauvoir Deli Co.");
        assert_eq!(merchant.group_id, "grp_00008zIcpbBOaAr7TTP3sv");
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = parse_transaction_created(b"{not json}").unwrap_err();
        assert!(matches!(err, WebhookError::Malformed(_)));
        assert!(err.to_string().starts_with("failed to decode webhook JSON"));
    }

    #[test]
    fn test_rejects_other_event_types() {
        let err = parse_transaction_created(br#"{"type": "account.updated", "data": {}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid webhook type"));
        assert!(err.to_string().contains("account.updated"));
    }

    #[test]
    fn test_rejects_unknown_envelope_field() {
        let body = r#"{"type": "transaction.created", "data": {}, "extra": 1}"#;
        let err = parse_transaction_created(body.as_bytes()).unwrap_err();
        assert!(matches!(err, WebhookError::Malformed(_)));
    }

    #[test]
    fn test_rejects_unknown_transaction_field() {
        let body = DELIVERY.replace("\"is_load\": false,", "\"is_load\": false, \"surprise\": true,");
        let err = parse_transaction_created(body.as_bytes()).unwrap_err();
        assert!(matches!(err, WebhookError::Malformed(_)));
        assert!(err.to_string().contains("surprise"));
    }

    #[test]
    fn test_pending_transaction_has_no_settlement() {
        let body = DELIVERY.replace("\"2015-09-05T14:28:40Z\"", "\"\"");
        let tx = parse_transaction_created(body.as_bytes()).unwrap();
        assert!(!tx.is_settled());
    }

    #[test]
    fn test_rejects_oversized_body() {
        let body = vec![b' '; MAX_BODY_BYTES + 1];
        let err = parse_transaction_created(&body).unwrap_err();
        assert!(matches!(err, WebhookError::TooLarge { limit: MAX_BODY_BYTES }));
    }

    #[test]
    fn test_reader_variant() {
        let tx = parse_transaction_created_reader(DELIVERY.as_bytes()).unwrap();
        assert_eq!(tx.amount, -350);

        let oversized = std::io::repeat(b' ').take(MAX_BODY_BYTES as u64 * 2);
        let err = parse_transaction_created_reader(oversized).unwrap_err();
        assert!(matches!(err, WebhookError::TooLarge { .. }));
    }
}
