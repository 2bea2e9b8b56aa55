//! # monzo-rs
//!
//! A typed async client for the Monzo banking API.
//!
//! This crate covers the Monzo developer API: identity, accounts, balances,
//! pots, transactions, the feed, attachments, receipts and webhooks. It
//! also ships the OAuth2 authorization code flow and a validator for
//! inbound webhook deliveries.
//!
//! ## Features
//!
//! - **Authentication**: OAuth2 authorization code flow with token refresh
//! - **Accounts and pots**: List accounts, read balances, move money between pots
//! - **Transactions**: List, fetch with expanded merchants, annotate metadata
//! - **Extras**: Feed items, attachments, itemised receipts
//! - **Webhooks**: Registration plus strict validation of deliveries
//! - **Type Safety**: Identifier newtypes, money as integer minor units
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use monzo_rs::{ClientConfig, MonzoClient, Session, Token};
//!
//! #[tokio::main]
//! async fn main() -> monzo_rs::Result<()> {
//!     let session = Session::new(Token::bearer("access-token"), None);
//!     let client = MonzoClient::from_session(session, ClientConfig::default())?;
//!
//!     let accounts = client.accounts().list(None).await?;
//!     println!("Found {} accounts", accounts.len());
//!
//!     if let Some(account) = accounts.first() {
//!         let balance = client.balances().get(&account.id).await?;
//!         println!("Balance: {} {}", balance.balance, balance.currency);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Moving Money Into a Pot
//!
//! ```rust,no_run
//! use monzo_rs::{AccountId, DedupeId, MonzoClient, PotId};
//!
//! # async fn example(client: MonzoClient) -> monzo_rs::Result<()> {
//! let pot = client
//!     .pots()
//!     .deposit(
//!         &PotId::new("pot_001"),
//!         &AccountId::new("acc_001"),
//!         1000,
//!         &DedupeId::new("deposit-2025-01-01"),
//!     )
//!     .await?;
//! println!("{} now holds {}", pot.name, pot.balance);
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every non-2xx response becomes [`Error::Api`] carrying the status and
//! the raw body. Nothing is retried.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod webhook;

// Re-export primary types at crate root for convenience
pub use error::{Error, Result, WebhookError};
pub use models::{AccountId, AccountType, AttachmentId, DedupeId, PotId, TransactionId, WebhookId};
pub use client::{ClientConfig, MonzoClient, Transport};
pub use auth::{AuthorizationFlow, OAuthConfig, Session, Token};

/// Prelude module for convenient imports.
///
/// ```rust
/// use monzo_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result, WebhookError};
    pub use crate::models::{
        // Primitives
        AccountId, AccountType, AttachmentId, DedupeId, PotId, TransactionId, WebhookId,
        // Resources
        Account, Attachment, Balance, Merchant, MerchantRef, Pagination, Pot, Receipt,
        ReceiptItem, Transaction, Webhook, WhoAmI,
    };
    pub use crate::api::FeedItem;
    pub use crate::client::{ClientConfig, MonzoClient, Transport};
    pub use crate::auth::{AuthorizationFlow, AuthorizedTransport, OAuthConfig, Session, Token};
    pub use crate::webhook::parse_transaction_created;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let account = AccountId::new("acc_001");
        assert_eq!(account.as_str(), "acc_001");
    }

    #[test]
    fn test_default_endpoints() {
        assert_eq!(ClientConfig::default().base_url, "https://api.monzo.com");
        let oauth = OAuthConfig::new("id", "secret", "http://localhost:8080/auth/callback");
        assert_eq!(oauth.auth_url, "https://auth.monzo.com/");
        assert_eq!(oauth.token_url, "https://api.monzo.com/oauth2/token");
    }

    #[test]
    fn test_account_type_wire_names() {
        assert_eq!(AccountType::UkRetail.as_str(), "uk_retail");
        assert_eq!(AccountType::UkRetailJoint.as_str(), "uk_retail_joint");
    }
}
