//! HTTP client and request dispatch for the Monzo API.
//!
//! This module provides the main entry point [`MonzoClient`] and the
//! [`Transport`] seam it sends requests through.
//!
//! # Example
//!
//! ```no_run
//! use monzo_rs::{MonzoClient, ClientConfig};
//!
//! # async fn example() -> monzo_rs::Result<()> {
//! // Unauthenticated transport pointed at a local mock server
//! let client = MonzoClient::with_config(
//!     reqwest::Client::new(),
//!     ClientConfig::default().with_base_url("http://127.0.0.1:8080"),
//! );
//!
//! let accounts = client.accounts().list(None).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub(crate) mod request;
mod transport;

pub use config::ClientConfig;
pub use http::MonzoClient;
pub use transport::{BoxFuture, Transport};
pub(crate) use http::ClientInner;
