//! API service modules for Monzo endpoints.
//!
//! Each service maps its method parameters onto one dispatcher call and
//! unwraps the response envelope.

mod accounts;
mod attachments;
mod balances;
mod feed;
mod identity;
mod pots;
mod receipts;
mod transactions;
mod webhooks;

pub use accounts::AccountsService;
pub use attachments::AttachmentsService;
pub use balances::BalancesService;
pub use feed::{FeedItem, FeedService};
pub use identity::IdentityService;
pub use pots::PotsService;
pub use receipts::ReceiptsService;
pub use transactions::TransactionsService;
pub use webhooks::WebhooksService;

use crate::{Error, Result};

/// Reject an empty identifier before it is spliced into a request path.
pub(crate) fn require_id(kind: &str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidInput(format!("{kind} id must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_id() {
        assert!(require_id("pot", "pot_001").is_ok());
        let err = require_id("pot", "").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: pot id must not be empty");
    }
}
