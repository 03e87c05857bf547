//! Prelude module for convenient imports.
//!
//! ```ignore
//! use influxdb2_api::prelude::*;
//! ```

pub use crate::models::*;
pub use crate::retry::{Backoff, RetryDecision, RetryHook, RetryPolicy};
pub use crate::{
    ApiConfig, ApiRequest, Envelope, Error, FileDownload, HyperClient, InfluxDb2Api, Method,
    NoContent, Parameters, RawBytes, RawResponse, RawText, RequestDescriptor, Result, Structured,
    Transport, TransportError, UsersQuery,
};
pub use serde::{Deserialize, Serialize};
