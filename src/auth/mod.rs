//! OAuth2 authentication for the Monzo API.
//!
//! The dispatcher in [`crate::client`] never sees credentials. This module
//! supplies them through [`AuthorizedTransport`], which signs every request
//! with a [`Session`]'s bearer token and refreshes it shortly before it
//! expires.
//!
//! # Logging in
//!
//! Monzo only issues tokens through the three-legged authorization code
//! flow. Send the user to [`AuthorizationFlow::authorize_url`], then finish
//! the flow with the query parameters of the redirect:
//!
//! ```no_run
//! use monzo_rs::{AuthorizationFlow, ClientConfig, MonzoClient, OAuthConfig, Session};
//! use monzo_rs::auth::CallbackParams;
//!
//! # async fn example(params: CallbackParams) -> monzo_rs::Result<()> {
//! let config = OAuthConfig::new(
//!     "oauth2client_123",
//!     "mnzconf.secret",
//!     "http://localhost:8080/auth/callback",
//! );
//! let flow = AuthorizationFlow::new(config.clone());
//! println!("Open {}", flow.authorize_url()?);
//!
//! let token = flow.finish(&params).await?;
//! let session = Session::new(token, Some(config));
//! let client = MonzoClient::from_session(session, ClientConfig::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Existing tokens
//!
//! A saved [`Token`] can be reused directly. Without an [`OAuthConfig`] the
//! session cannot refresh, so the token works until Monzo rejects it.

mod flow;
mod session;
mod token;
mod transport;

pub use flow::{AuthorizationFlow, CallbackHandle, CallbackParams};
pub use session::Session;
pub use token::{OAuthConfig, Token};
pub use transport::AuthorizedTransport;
