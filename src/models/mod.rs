//! Data models for the Monzo API.
//!
//! Models mirror the JSON shapes of the API. Money is always an `i64` count
//! of minor units. Models are organized by domain:
//!
//! - [`primitives`] - Identifier newtypes and API constants
//! - [`account`] - Accounts and the whoami check
//! - [`balance`] - Balances and pots
//! - [`transaction`] - Transactions, merchants and pagination
//! - [`attachment`] - Transaction attachments
//! - [`receipt`] - Itemised receipts
//! - [`webhook`] - Webhook registrations

pub mod primitives;
pub mod account;
pub mod balance;
pub mod transaction;
pub mod attachment;
pub mod receipt;
pub mod webhook;

// Re-export commonly used types
pub use primitives::*;
pub use account::*;
pub use balance::*;
pub use transaction::*;
pub use attachment::*;
pub use receipt::*;
pub use webhook::*;
