//! Settings of the HTTP transport that talks to an InfluxDB 2 server.
//!
//! The defaults suit a single local server such as `http://localhost:8086`:
//! one host, a small keep-alive pool and a timeout long enough for a
//! `/query` or `/write` that moves a few megabytes. InfluxDB Cloud setups
//! usually keep them too and only change the `User-Agent` so requests show
//! up under the application's name in the server logs.
//!
//! ```
//! use std::time::Duration;
//!
//! use influxdb2_api::TransportConfig;
//!
//! let config = TransportConfig::builder()
//!     .timeout(Duration::from_secs(120))
//!     .user_agent("telegraf/1.30")
//!     .build();
//! assert_eq!(config.connect_timeout, Duration::from_secs(10));
//! ```

use std::time::Duration;

/// Default `User-Agent` header sent by [`HyperClient`](crate::HyperClient).
pub const DEFAULT_USER_AGENT: &str = concat!("influxdb2-api-rs/", env!("CARGO_PKG_VERSION"));

/// Configuration for the HTTP transport.
///
/// Shared by every endpoint group built over the same [`HyperClient`](crate::HyperClient).
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-exchange timeout, covering slow queries and large writes.
    pub timeout: Duration,
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Maximum idle connections kept to the server.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
    /// `User-Agent` header value, unless the request sets its own.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl TransportConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::default()
    }
}

/// Builder for [`TransportConfig`].
#[derive(Debug, Clone, Default)]
pub struct TransportConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TransportConfigBuilder {
    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Set the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> TransportConfig {
        let defaults = TransportConfig::default();
        TransportConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        }
    }
}
