//! Balance service.

use std::sync::Arc;

use reqwest::Method;

use crate::client::request::{Params, RequestBody};
use crate::client::ClientInner;
use crate::models::{AccountId, Balance};
use crate::Result;

/// Service for balance lookups.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: monzo_rs::MonzoClient) -> monzo_rs::Result<()> {
/// use monzo_rs::AccountId;
///
/// let balance = client.balances().get(&AccountId::new("acc_123")).await?;
/// println!("{} minor units of {}", balance.balance, balance.currency);
/// # Ok(())
/// # }
/// ```
pub struct BalancesService {
    inner: Arc<ClientInner>,
}

impl BalancesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get the current balance of an account.
    pub async fn get(&self, account_id: &AccountId) -> Result<Balance> {
        let query = Params::new().with("account_id", account_id.as_str());
        self.inner
            .request(Method::GET, "/balance", query, RequestBody::Empty)
            .await
    }
}
