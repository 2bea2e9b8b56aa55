//! Primitive types and newtypes for type-safe API interactions.
//!
//! These wrap the string identifiers Monzo hands out so an account id
//! cannot be passed where a pot id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Production base URL for the Monzo API.
pub const API_BASE_URL: &str = "https://api.monzo.com";

/// Monzo's OAuth2 authorization page.
pub const AUTH_URL: &str = "https://auth.monzo.com/";

/// Monzo's OAuth2 token endpoint.
pub const TOKEN_URL: &str = "https://api.monzo.com/oauth2/token";

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns `true` if the identifier is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

id_type!(
    /// A Monzo account identifier (`acc_...`).
    ///
    /// # Example
    ///
    /// ```
    /// use monzo_rs::AccountId;
    ///
    /// let account = AccountId::new("acc_00009237aqC8c5umZmrRdh");
    /// assert_eq!(account.as_str(), "acc_00009237aqC8c5umZmrRdh");
    /// ```
    AccountId
);

id_type!(
    /// A pot identifier (`pot_...`).
    PotId
);

id_type!(
    /// A transaction identifier (`tx_...`).
    TransactionId
);

id_type!(
    /// A registered webhook identifier (`webhook_...`).
    WebhookId
);

id_type!(
    /// An attachment identifier (`attach_...`).
    AttachmentId
);

/// Caller-chosen de-duplication token for pot transfers.
///
/// Monzo ignores a repeated transfer carrying the same token. The crate
/// neither generates nor checks these; uniqueness is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupeId(String);

impl DedupeId {
    /// Wrap a de-duplication token.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DedupeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DedupeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Filter for [`AccountsService::list`](crate::api::AccountsService::list).
///
/// Monzo adds account types over time; anything not listed here travels as
/// [`AccountType::Other`] and is sent verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccountType {
    /// Personal current account
    UkRetail,
    /// Joint current account
    UkRetailJoint,
    /// Business account
    UkBusiness,
    /// Any other wire value, e.g. `uk_prepaid` or `uk_monzo_flex`
    Other(String),
}

impl AccountType {
    /// The wire value used in the `account_type` query parameter.
    pub fn as_str(&self) -> &str {
        match self {
            AccountType::UkRetail => "uk_retail",
            AccountType::UkRetailJoint => "uk_retail_joint",
            AccountType::UkBusiness => "uk_business",
            AccountType::Other(raw) => raw,
        }
    }
}

impl From<&str> for AccountType {
    fn from(s: &str) -> Self {
        match s {
            "uk_retail" => AccountType::UkRetail,
            "uk_retail_joint" => AccountType::UkRetailJoint,
            "uk_business" => AccountType::UkBusiness,
            other => AccountType::Other(other.to_string()),
        }
    }
}

impl From<String> for AccountType {
    fn from(s: String) -> Self {
        match AccountType::from(s.as_str()) {
            AccountType::Other(_) => AccountType::Other(s),
            known => known,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = PotId::new("pot_001");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""pot_001""#);

        let parsed: AccountId = serde_json::from_str(r#""acc_001""#).unwrap();
        assert_eq!(parsed, AccountId::from("acc_001"));
        assert_eq!(parsed.to_string(), "acc_001");
    }

    #[test]
    fn test_empty_id() {
        assert!(TransactionId::new("").is_empty());
        assert!(!WebhookId::new("webhook_1").is_empty());
    }

    #[test]
    fn test_account_type_wire_values() {
        assert_eq!(AccountType::UkRetail.as_str(), "uk_retail");
        assert_eq!(AccountType::UkRetailJoint.to_string(), "uk_retail_joint");
    }

    #[test]
    fn test_account_type_from_wire() {
        assert_eq!(AccountType::from("uk_business"), AccountType::UkBusiness);
        let prepaid = AccountType::from("uk_prepaid");
        assert_eq!(prepaid, AccountType::Other("uk_prepaid".to_string()));
        assert_eq!(prepaid.as_str(), "uk_prepaid");
    }
}
