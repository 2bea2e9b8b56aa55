//! Transactions service.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Method;

use crate::api::require_id;
use crate::client::request::{Params, RequestBody};
use crate::client::ClientInner;
use crate::models::{AccountId, Pagination, Transaction, TransactionId};
use crate::Result;

#[derive(serde::Deserialize)]
struct TransactionResponse {
    transaction: Transaction,
}

/// Service for reading and annotating transactions.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: monzo_rs::MonzoClient) -> monzo_rs::Result<()> {
/// use monzo_rs::AccountId;
/// use monzo_rs::models::Pagination;
///
/// let account = AccountId::new("acc_001");
/// let page = Pagination::new().limit(50).since("2025-01-01T00:00:00Z");
///
/// for tx in client.transactions().list(&account, Some(&page)).await? {
///     println!("{} {} {}", tx.created, tx.amount, tx.description);
/// }
/// # Ok(())
/// # }
/// ```
pub struct TransactionsService {
    inner: Arc<ClientInner>,
}

impl TransactionsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get a single transaction.
    ///
    /// With `expand_merchant` the merchant arrives as a full record instead
    /// of a bare id.
    pub async fn get(
        &self,
        transaction_id: &TransactionId,
        expand_merchant: bool,
    ) -> Result<Transaction> {
        require_id("transaction", transaction_id.as_str())?;
        let mut query = Params::new();
        if expand_merchant {
            query.push("expand[]", "merchant");
        }

        let response: TransactionResponse = self
            .inner
            .request(
                Method::GET,
                &format!("/transactions/{}", transaction_id),
                query,
                RequestBody::Empty,
            )
            .await?;
        Ok(response.transaction)
    }

    /// List one page of transactions for an account.
    ///
    /// Pagination values are forwarded as-is; no further pages are fetched.
    pub async fn list(
        &self,
        account_id: &AccountId,
        pagination: Option<&Pagination>,
    ) -> Result<Vec<Transaction>> {
        #[derive(serde::Deserialize)]
        struct Response {
            transactions: Vec<Transaction>,
        }

        let mut query = Params::new().with("account_id", account_id.as_str());
        if let Some(page) = pagination {
            if page.limit > 0 {
                query.push("limit", page.limit.to_string());
            }
            query.push_non_empty("since", &page.since);
            query.push_non_empty("before", &page.before);
        }

        let response: Response = self
            .inner
            .request(Method::GET, "/transactions", query, RequestBody::Empty)
            .await?;
        Ok(response.transactions)
    }

    /// Add or update metadata on a transaction.
    ///
    /// An empty value deletes that key.
    pub async fn annotate(
        &self,
        transaction_id: &TransactionId,
        metadata: &HashMap<String, String>,
    ) -> Result<Transaction> {
        require_id("transaction", transaction_id.as_str())?;
        let mut form = Params::new();
        for (key, value) in metadata {
            form.push(format!("metadata[{key}]"), value.as_str());
        }

        let response: TransactionResponse = self
            .inner
            .request(
                Method::PATCH,
                &format!("/transactions/{}", transaction_id),
                Params::new(),
                RequestBody::Form(form),
            )
            .await?;
        Ok(response.transaction)
    }
}
