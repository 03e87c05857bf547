//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use influxdb2_api_core::prelude::*;
//! ```

pub use crate::{
    Cause, ContentType, Envelope, Error, FileDownload, Form, Method, NoContent, ParamValue,
    Parameters, Part, RawBytes, RawResponse, RawText, Request, RequestDescriptor, Response,
    Result, ResultShape, Shape, Structured, Transport, from_json, to_error_body, to_json,
};
