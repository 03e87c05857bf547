//! Async client for the InfluxDB 2 REST API.
//!
//! Every endpoint method returns an [`ApiRequest`], typed by the shape of its
//! successful result. Requests share one [`ApiConfig`]: server base path,
//! default headers, the [`Transport`] and the runtime completions run on.
//!
//! # Example
//!
//! ```ignore
//! use influxdb2_api::prelude::*;
//!
//! let config = ApiConfig::builder("http://localhost:8086")
//!     .header("Authorization", "Token my-token")
//!     .build()?;
//! let api = InfluxDb2Api::new(config);
//!
//! let page = api.users().get_users(UsersQuery::default().limit(20), None).await?;
//! let keys = api.secrets().get_orgs_id_secrets("0a1b", None).await?;
//! ```
//!
//! Lower level building blocks live in [`influxdb2_api_core`] and are
//! re-exported here.

mod api_config;
pub mod apis;
mod client;
mod config;
mod connector;
pub mod middleware;
pub mod models;
pub mod prelude;
mod request_builder;
pub mod retry;

pub use api_config::{API_PREFIX, ApiConfig, ApiConfigBuilder};
pub use apis::{InfluxDb2Api, SecretsApi, SetupApi, UsersApi, UsersQuery, ZAP_TRACE_SPAN};
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{DEFAULT_USER_AGENT, TransportConfig, TransportConfigBuilder};
pub use request_builder::{ApiRequest, Progress};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use influxdb2_api_core::{
    BoxFuture, Cause, ContentType, DescriptorBuilder, DownloadError, EncodingStrategy, Envelope,
    Error, ErrorBody, FileDownload, Form, FormPartContentType, Method, NoContent, ParamValue,
    ParameterEncoder, Parameters, Part, PathTemplate, Payload, RawBytes, RawResponse, RawText,
    Request, RequestDescriptor, Response, ResponseHead, Result, ResultShape, Shape, Structured,
    ToQueryPairs, Transport, TransportError, from_json, process_response, to_error_body, to_json,
};

// Re-export http types for status codes and headers
pub use influxdb2_api_core::{StatusCode, header};
