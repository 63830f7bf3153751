//! Sync client configuration.

use std::time::Duration;

/// Configuration for the registry client.
#[derive(Debug, Clone)]
pub struct SyncClientConfig {
    /// Base URL of the backend.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for SyncClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("dosewatch-sync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SyncClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> SyncClientConfigBuilder {
        SyncClientConfigBuilder::default()
    }
}

/// Builder for the registry client configuration.
#[derive(Debug, Default)]
pub struct SyncClientConfigBuilder {
    config: SyncClientConfig,
}

impl SyncClientConfigBuilder {
    /// Set the backend base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> SyncClientConfig {
        self.config
    }
}
