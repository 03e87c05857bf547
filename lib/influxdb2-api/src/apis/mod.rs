//! Endpoint groups.
//!
//! Each group is a thin wrapper over an [`ApiConfig`]. For every endpoint it
//! offers a `*_request` method returning the unsent [`ApiRequest`](crate::ApiRequest),
//! for retry hooks, cancellation or completion callbacks, and an async method
//! that sends it and returns the body.
//!
//! Every endpoint takes an optional OpenTracing span context, sent as the
//! [`ZAP_TRACE_SPAN`] header.

mod secrets;
mod setup;
mod users;

pub use secrets::SecretsApi;
pub use setup::SetupApi;
pub use users::{UsersApi, UsersQuery};

use crate::ApiConfig;

/// Header carrying an OpenTracing span context.
pub const ZAP_TRACE_SPAN: &str = "Zap-Trace-Span";

/// Entry point to every endpoint group.
#[derive(Debug, Clone)]
pub struct InfluxDb2Api {
    config: ApiConfig,
}

impl InfluxDb2Api {
    /// Create the API over a configuration.
    #[must_use]
    pub const fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// The shared configuration.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// User endpoints.
    #[must_use]
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.config.clone())
    }

    /// Organization secret endpoints.
    #[must_use]
    pub fn secrets(&self) -> SecretsApi {
        SecretsApi::new(self.config.clone())
    }

    /// Initial setup endpoints.
    #[must_use]
    pub fn setup(&self) -> SetupApi {
        SetupApi::new(self.config.clone())
    }
}
