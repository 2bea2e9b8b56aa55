//! Accounts service.

use std::sync::Arc;

use reqwest::Method;

use crate::client::request::{Params, RequestBody};
use crate::client::ClientInner;
use crate::models::{Account, AccountType};
use crate::Result;

/// Service for account-related operations.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: monzo_rs::MonzoClient) -> monzo_rs::Result<()> {
/// use monzo_rs::AccountType;
///
/// let accounts = client.accounts().list(Some(AccountType::UkRetail)).await?;
/// for account in accounts {
///     println!("{}: {}", account.id, account.description);
/// }
/// # Ok(())
/// # }
/// ```
pub struct AccountsService {
    inner: Arc<ClientInner>,
}

impl AccountsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List the user's accounts, optionally filtered by type.
    ///
    /// An empty [`AccountType::Other`] is treated as no filter.
    pub async fn list(&self, account_type: Option<AccountType>) -> Result<Vec<Account>> {
        #[derive(serde::Deserialize)]
        struct Response {
            accounts: Vec<Account>,
        }

        let mut query = Params::new();
        if let Some(account_type) = &account_type {
            query.push_non_empty("account_type", account_type.as_str());
        }

        let response: Response = self
            .inner
            .request(Method::GET, "/accounts", query, RequestBody::Empty)
            .await?;
        Ok(response.accounts)
    }
}
