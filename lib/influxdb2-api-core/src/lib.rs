//! Core types for the InfluxDB 2 API client pipeline.
//!
//! This crate holds everything that does not need a runtime:
//! - [`Method`] - HTTP method enum
//! - [`RequestDescriptor`] and [`Parameters`] - one logical API call before encoding
//! - [`ParameterEncoder`] - query, JSON and multipart encoding into a wire [`Request`]
//! - [`Form`] and [`Part`] - multipart/form-data bodies
//! - [`RawResponse`] and [`Envelope`] - transport outcome and successful result
//! - [`Shape`] and [`process_response`] - result shapes and response classification
//! - [`Error`], [`Cause`] and [`Result`] - the uniform error value
//! - [`to_error_body`] - best-effort error body extraction
//! - [`Transport`] - the seam to the network layer
//! - [`PathTemplate`] - path parameter substitution

mod body;
mod descriptor;
mod download;
mod encoding;
mod error;
mod method;
mod multipart;
mod params;
mod path_template;
pub mod prelude;
mod request;
mod response;
mod shape;
mod transport;

pub use body::{ContentType, ErrorBody, from_json, to_error_body, to_json};
pub use descriptor::{DescriptorBuilder, Payload, RequestDescriptor};
pub use download::{download_path, filename_from_content_disposition, persist_download};
pub use encoding::{EncodingStrategy, FormPartContentType, ParameterEncoder};
pub use error::{
    CONFIG_FAILURE, Cause, DOWNLOAD_FAILURE, DownloadError, ENCODING_FAILURE, Error,
    MISSING_RESPONSE, Result, TRANSPORT_FAILURE, TransportError,
};
pub use method::Method;
pub use multipart::{Form, Part, guess_content_type};
pub use params::{ParamValue, Parameters};
pub use path_template::PathTemplate;
pub use request::Request;
pub use response::{Envelope, RawResponse, Response, ResponseHead};
pub use shape::{
    FileDownload, NoContent, RawBytes, RawText, ResponseContext, ResultShape, Shape, Structured,
    process_response,
};
pub use transport::{BoxFuture, Transport};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};

/// Trait for types that can be converted to query parameter pairs.
///
/// Implemented by [`Parameters`]; file values are never part of a query.
pub trait ToQueryPairs {
    /// Convert this type to a vector of key-value pairs for query parameters.
    fn to_query_pairs(&self) -> Vec<(String, String)>;
}
