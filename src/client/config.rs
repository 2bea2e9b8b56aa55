//! Client configuration options.

use std::time::Duration;

use crate::models::API_BASE_URL;

/// Configuration for the Monzo client.
///
/// # Example
///
/// ```
/// use monzo_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is resolved against
    pub base_url: String,
    /// Request timeout applied by the bundled transport
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Refresh the access token when it expires within this many seconds
    pub refresh_buffer_secs: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("monzo-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            refresh_buffer_secs: 60,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different server.
    ///
    /// Meant for tests against a mock server. The base URL is fixed once the
    /// client is built.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the buffer time before expiry to refresh.
    pub fn with_refresh_buffer(mut self, secs: i64) -> Self {
        self.refresh_buffer_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.monzo.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.refresh_buffer_secs, 60);
        assert!(config.user_agent.starts_with("monzo-rs/"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new()
            .with_base_url("http://127.0.0.1:9999")
            .with_timeout(Duration::from_secs(5))
            .with_refresh_buffer(120);
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.refresh_buffer_secs, 120);
    }
}
