//! Token check and logout.

use std::sync::Arc;

use reqwest::Method;

use crate::client::request::{Params, RequestBody};
use crate::client::ClientInner;
use crate::models::WhoAmI;
use crate::Result;

/// Service for checking and invalidating the current access token.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: monzo_rs::MonzoClient) -> monzo_rs::Result<()> {
/// let who = client.identity().whoami().await?;
/// if who.authenticated {
///     println!("Logged in as {}", who.user_id);
/// }
/// # Ok(())
/// # }
/// ```
pub struct IdentityService {
    inner: Arc<ClientInner>,
}

impl IdentityService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Check whether the access token is valid and who it belongs to.
    pub async fn whoami(&self) -> Result<WhoAmI> {
        self.inner
            .request(Method::GET, "/ping/whoami", Params::new(), RequestBody::Empty)
            .await
    }

    /// Invalidate the current access token.
    pub async fn logout(&self) -> Result<()> {
        self.inner
            .request_discard(Method::POST, "/oauth2/logout", Params::new(), RequestBody::Empty)
            .await
    }
}
