//! Error types for the Monzo API client.
//!
//! Every failure is returned to the caller as an [`Error`]. Nothing is
//! retried or recovered inside the crate.

use thiserror::Error;

/// A specialized `Result` type for Monzo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Monzo API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be sent or the response could not be read
    /// (DNS, connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    ///
    /// The body is kept verbatim. Monzo does not guarantee a stable error
    /// schema, so it is never parsed.
    #[error("API error (status {status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// A JSON request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A successful response did not match the expected shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// An inbound webhook payload was rejected.
    #[error("webhook rejected: {0}")]
    Webhook(#[from] WebhookError),

    /// The OAuth2 flow or token endpoint failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Reasons an inbound webhook body is rejected.
#[derive(Error, Debug)]
pub enum WebhookError {
    /// The body exceeded the size cap before decoding started.
    #[error("payload exceeds {limit} bytes")]
    TooLarge {
        /// The cap that was exceeded, in bytes
        limit: usize,
    },

    /// The body was not valid JSON or did not match the envelope schema.
    #[error("failed to decode webhook JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The envelope decoded but carried an unsupported event type.
    #[error("invalid webhook type: expected 'transaction.created', got '{0}'")]
    UnexpectedType(String),

    /// The body could not be read.
    #[error("failed to read webhook body: {0}")]
    Read(#[from] std::io::Error),
}

impl Error {
    /// The HTTP status carried by an [`Error::Api`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for a 401 from the API.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Api { status: 401, .. })
    }

    /// Returns `true` for a 403 from the API.
    ///
    /// Monzo answers 403 until the user approves the client in the app.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Error::Api { status: 403, .. })
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => (400..500).contains(status),
            Error::InvalidInput(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication(_)) || self.is_unauthorized()
    }
}
