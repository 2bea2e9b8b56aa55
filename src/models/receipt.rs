//! Receipt models.
//!
//! Receipts are written as a JSON body, so optional fields are left out of
//! the encoded document rather than sent empty.

use serde::{Deserialize, Serialize};

fn is_zero(value: &i64) -> bool {
    *value == 0
}

fn is_zero_f64(value: &f64) -> bool {
    *value == 0.0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// An itemised receipt attached to a transaction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Receipt {
    /// Monzo-assigned receipt id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Transaction the receipt belongs to
    #[serde(default)]
    pub transaction_id: String,
    /// Caller-chosen id; repeated writes with the same id update the receipt
    #[serde(default)]
    pub external_id: String,
    /// Receipt total in minor units
    #[serde(default)]
    pub total: i64,
    /// ISO 4217 currency code
    #[serde(default)]
    pub currency: String,
    /// Line items
    #[serde(default)]
    pub items: Vec<ReceiptItem>,
    /// Taxes applied
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taxes: Vec<ReceiptTax>,
    /// Payments made
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payments: Vec<ReceiptPayment>,
    /// Merchant details printed on the receipt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<ReceiptMerchant>,
}

/// A receipt line item. Items nest through `sub_items`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Item description
    #[serde(default)]
    pub description: String,
    /// Number of units; may be fractional
    #[serde(default, skip_serializing_if = "is_zero_f64")]
    pub quantity: f64,
    /// Unit of measurement, e.g. `kg`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,
    /// Total cost of the line in minor units
    #[serde(default)]
    pub amount: i64,
    /// ISO 4217 currency code
    #[serde(default)]
    pub currency: String,
    /// Tax on this line in minor units
    #[serde(default, skip_serializing_if = "is_zero")]
    pub tax: i64,
    /// Modifiers such as toppings or add-ons
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_items: Vec<ReceiptItem>,
}

/// A tax line on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReceiptTax {
    /// Tax name, e.g. `VAT`
    #[serde(default)]
    pub description: String,
    /// Tax amount in minor units
    #[serde(default)]
    pub amount: i64,
    /// ISO 4217 currency code
    #[serde(default)]
    pub currency: String,
    /// Merchant tax registration number
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tax_number: String,
}

/// A payment line on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReceiptPayment {
    /// `card`, `cash` or `gift_card`
    #[serde(rename = "type", default)]
    pub payment_type: String,
    /// Amount paid in minor units
    #[serde(default)]
    pub amount: i64,
    /// ISO 4217 currency code
    #[serde(default)]
    pub currency: String,
    /// Last four digits of the card
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_four: String,
    /// Gift card description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gift_card_type: String,
    /// Card bank identification number
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bin: String,
    /// Card authorisation code
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auth_code: String,
    /// EMV application identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub aid: String,
    /// Merchant id at the acquirer
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mid: String,
    /// Terminal id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tid: String,
}

/// Merchant details as printed on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReceiptMerchant {
    /// Merchant name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Whether the purchase was made online
    #[serde(default, skip_serializing_if = "is_false")]
    pub online: bool,
    /// Contact phone number
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    /// Contact email address
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    /// Store name, e.g. `Old Street`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub store_name: String,
    /// Store street address
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub store_address: String,
    /// Store postal code
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub store_postcode: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_omits_empty_optionals() {
        let receipt = Receipt {
            transaction_id: "tx_001".into(),
            external_id: "order-42".into(),
            total: 1250,
            currency: "GBP".into(),
            items: vec![ReceiptItem {
                description: "Burger".into(),
                amount: 1250,
                currency: "GBP".into(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let value = serde_json::to_value(&receipt).unwrap();
        assert!(value.get("id").is_none());
        assert!(value.get("taxes").is_none());
        assert!(value.get("payments").is_none());
        assert!(value.get("merchant").is_none());

        let item = &value["items"][0];
        assert_eq!(item["amount"], 1250);
        assert!(item.get("quantity").is_none());
        assert!(item.get("sub_items").is_none());
    }

    #[test]
    fn test_receipt_nested_sub_items() {
        let json = r#"{
            "transaction_id": "tx_001",
            "external_id": "order-42",
            "total": 900,
            "currency": "GBP",
            "items": [{
                "description": "Pizza",
                "quantity": 1.5,
                "amount": 800,
                "currency": "GBP",
                "sub_items": [{"description": "Extra cheese", "amount": 100, "currency": "GBP"}]
            }],
            "payments": [{"type": "card", "amount": 900, "currency": "GBP", "last_four": "4242"}]
        }"#;

        let receipt: Receipt = serde_json::from_str(json).unwrap();
        let item = &receipt.items[0];
        assert_eq!(item.quantity, 1.5);
        assert_eq!(item.sub_items[0].description, "Extra cheese");
        assert_eq!(item.sub_items[0].amount, 100);
        assert_eq!(receipt.payments[0].payment_type, "card");
        assert_eq!(receipt.payments[0].last_four, "4242");
    }
}
