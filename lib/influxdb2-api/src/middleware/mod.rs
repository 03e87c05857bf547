//! Tower middleware layers for the HTTP transport.
//!
//! Layers wrap the hyper transport inside [`HyperClient`](crate::HyperClient)
//! and see every attempt of every request. Add them with
//! [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer), or use
//! the helpers:
//!
//! ```ignore
//! use influxdb2_api::HyperClient;
//!
//! let client = HyperClient::builder().with_logging().build();
//! ```
//!
//! - [`LoggingLayer`] - logs requests/responses using `tracing`

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

pub use tower::ServiceBuilder;
