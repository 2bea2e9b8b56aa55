//! The seam between the dispatcher and the network.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::Result;

/// Type alias for a boxed future used by [`Transport`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Sends a fully built request and returns the raw response.
///
/// The dispatcher never touches credentials. An implementation is expected
/// to attach the bearer token (and refresh it when needed) before sending;
/// see [`AuthorizedTransport`](crate::auth::AuthorizedTransport).
///
/// Dropping the returned future abandons the request.
pub trait Transport: Send + Sync {
    /// Send one request.
    fn execute(&self, request: reqwest::Request) -> BoxFuture<'_, Result<reqwest::Response>>;
}

/// Unauthenticated transport, useful against mock servers.
impl Transport for reqwest::Client {
    fn execute(&self, request: reqwest::Request) -> BoxFuture<'_, Result<reqwest::Response>> {
        Box::pin(async move { Ok(reqwest::Client::execute(self, request).await?) })
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: reqwest::Request) -> BoxFuture<'_, Result<reqwest::Response>> {
        (**self).execute(request)
    }
}
