//! Pots service.

use std::sync::Arc;

use reqwest::Method;

use crate::api::require_id;
use crate::client::request::{Params, RequestBody};
use crate::client::ClientInner;
use crate::models::{AccountId, DedupeId, Pot, PotId};
use crate::Result;

/// Service for listing pots and moving money in and out of them.
///
/// Transfers carry a caller-supplied [`DedupeId`]. Monzo drops a repeated
/// transfer with the same token; the crate forwards it untouched.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: monzo_rs::MonzoClient) -> monzo_rs::Result<()> {
/// use monzo_rs::{AccountId, DedupeId, PotId};
///
/// let account = AccountId::new("acc_001");
/// let pot = client
///     .pots()
///     .deposit(&PotId::new("pot_001"), &account, 1000, &DedupeId::new("dedupe-123"))
///     .await?;
/// println!("Pot now holds {}", pot.balance);
/// # Ok(())
/// # }
/// ```
pub struct PotsService {
    inner: Arc<ClientInner>,
}

impl PotsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List the pots owned by a current account.
    pub async fn list(&self, current_account_id: &AccountId) -> Result<Vec<Pot>> {
        #[derive(serde::Deserialize)]
        struct Response {
            pots: Vec<Pot>,
        }

        let query = Params::new().with("current_account_id", current_account_id.as_str());
        let response: Response = self
            .inner
            .request(Method::GET, "/pots", query, RequestBody::Empty)
            .await?;
        Ok(response.pots)
    }

    /// Move `amount` minor units from `source_account_id` into a pot.
    pub async fn deposit(
        &self,
        pot_id: &PotId,
        source_account_id: &AccountId,
        amount: i64,
        dedupe_id: &DedupeId,
    ) -> Result<Pot> {
        require_id("pot", pot_id.as_str())?;
        let form = Params::new()
            .with("source_account_id", source_account_id.as_str())
            .with("amount", amount.to_string())
            .with("dedupe_id", dedupe_id.as_str());

        self.inner
            .request(
                Method::PUT,
                &format!("/pots/{}/deposit", pot_id),
                Params::new(),
                RequestBody::Form(form),
            )
            .await
    }

    /// Move `amount` minor units from a pot into `destination_account_id`.
    pub async fn withdraw(
        &self,
        pot_id: &PotId,
        destination_account_id: &AccountId,
        amount: i64,
        dedupe_id: &DedupeId,
    ) -> Result<Pot> {
        require_id("pot", pot_id.as_str())?;
        let form = Params::new()
            .with("destination_account_id", destination_account_id.as_str())
            .with("amount", amount.to_string())
            .with("dedupe_id", dedupe_id.as_str());

        self.inner
            .request(
                Method::PUT,
                &format!("/pots/{}/withdraw", pot_id),
                Params::new(),
                RequestBody::Form(form),
            )
            .await
    }
}
