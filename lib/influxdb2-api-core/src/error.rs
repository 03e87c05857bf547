//! Error types for the API pipeline.
//!
//! Every failed request produces exactly one [`Error`]: a numeric code (the
//! HTTP status, or a synthetic code for failures that never reached a status),
//! the response headers and best-effort decoded body when they exist, and the
//! underlying [`Cause`].

use std::collections::HashMap;
use std::path::PathBuf;

use derive_more::{Display, Error, From};

use crate::ErrorBody;

/// Code for transport-level failures (network, TLS, timeout, cancellation).
pub const TRANSPORT_FAILURE: i32 = -1;

/// Code for a transport outcome that carries neither an error nor a response.
pub const MISSING_RESPONSE: i32 = -2;

/// Code for failures while building the wire request.
pub const ENCODING_FAILURE: i32 = 415;

/// Code for failures while persisting a downloaded file.
pub const DOWNLOAD_FAILURE: i32 = 400;

/// Code for invalid client configuration.
pub const CONFIG_FAILURE: i32 = 0;

// ============================================================================
// Transport Errors
// ============================================================================

/// Failure reported by the transport before any HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TransportError {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    Tls(#[error(not(source))] String),

    /// The transport rejected the wire request (invalid header, URI, ...).
    #[display("request rejected by transport: {_0}")]
    Rejected(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    Timeout,

    /// The caller's cancellation signal fired.
    #[display("request cancelled")]
    Cancelled,
}

// ============================================================================
// Download Errors
// ============================================================================

/// Failure while persisting a file-download response.
#[derive(Debug, Display, Error)]
pub enum DownloadError {
    /// The response carried no data to write.
    #[display("response data missing")]
    ResponseDataMissing,

    /// Neither the request path nor the response named a file.
    #[display("request URL has no usable path")]
    RequestMissingPath,

    /// Writing the file failed.
    #[display("cannot write {}: {source}", path.display())]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

// ============================================================================
// Cause
// ============================================================================

/// Underlying reason of an [`Error`].
#[derive(Debug, Display, Error, From)]
pub enum Cause {
    /// Transport-level failure.
    #[display("{_0}")]
    #[from]
    Transport(TransportError),

    /// The transport produced neither an error nor a response.
    #[display("missing HTTP response")]
    #[from(skip)]
    MissingResponse,

    /// The status code is outside the 2xx range.
    #[display("unsuccessful HTTP status code")]
    #[from(skip)]
    UnsuccessfulStatus,

    /// A structured body was expected but none arrived.
    #[display("empty response body")]
    #[from(skip)]
    EmptyData,

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "links.self").
        path: String,
        /// Error message.
        message: String,
    },

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// A file parameter could not be read.
    #[display("cannot read file {}: {source}", path.display())]
    #[from(skip)]
    MissingFile {
        /// Path of the file parameter.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// File-download persistence error.
    #[display("download failed: {_0}")]
    #[from]
    Download(DownloadError),

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// Invalid client configuration.
    #[display("invalid configuration: {_0}")]
    #[from(skip)]
    InvalidConfig(#[error(not(source))] String),
}

// ============================================================================
// Error Type
// ============================================================================

/// Uniform error value for a failed API call.
#[derive(Debug, Display, Error)]
#[display("request failed with code {code}: {cause}")]
pub struct Error {
    code: i32,
    headers: Option<HashMap<String, String>>,
    body: Option<ErrorBody>,
    #[error(source)]
    cause: Cause,
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error from a code and a cause.
    #[must_use]
    pub fn new(code: i32, cause: impl Into<Cause>) -> Self {
        Self {
            code,
            headers: None,
            body: None,
            cause: cause.into(),
        }
    }

    /// Create a transport-level error (code `-1`).
    #[must_use]
    pub fn transport(error: TransportError) -> Self {
        Self::new(TRANSPORT_FAILURE, error)
    }

    /// Create a request-construction error (code `415`).
    #[must_use]
    pub fn encoding(cause: impl Into<Cause>) -> Self {
        Self::new(ENCODING_FAILURE, cause)
    }

    /// Create a download persistence error (code `400`).
    #[must_use]
    pub fn download(error: DownloadError) -> Self {
        Self::new(DOWNLOAD_FAILURE, error)
    }

    /// Create an invalid request error (code `415`).
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::encoding(Cause::InvalidRequest(message.into()))
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(CONFIG_FAILURE, Cause::InvalidConfig(message.into()))
    }

    /// Attach response headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Attach the extracted error body.
    #[must_use]
    pub fn with_body(mut self, body: Option<ErrorBody>) -> Self {
        self.body = body;
        self
    }

    /// Status code, or synthetic code for failures without a status.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// Returns the HTTP status code if the code is a real HTTP status.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        u16::try_from(self.code)
            .ok()
            .filter(|status| (100..600).contains(status))
    }

    /// Response headers, if a response was received.
    #[must_use]
    pub fn headers(&self) -> Option<&HashMap<String, String>> {
        self.headers.as_ref()
    }

    /// Decoded error body, if the response carried a JSON object.
    #[must_use]
    pub fn body(&self) -> Option<&ErrorBody> {
        self.body.as_ref()
    }

    /// Underlying cause.
    #[must_use]
    pub const fn cause(&self) -> &Cause {
        &self.cause
    }

    /// Consume into the underlying cause.
    #[must_use]
    pub fn into_cause(self) -> Cause {
        self.cause
    }

    /// Returns `true` if the transport failed before any response.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self.cause, Cause::Transport(_))
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self.cause, Cause::Transport(TransportError::Timeout))
    }

    /// Returns `true` if the request was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self.cause, Cause::Transport(TransportError::Cancelled))
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code == 404
    }

    /// Try to decode the error body into a typed value.
    ///
    /// Returns `None` when no body was extracted.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Debug, Deserialize)]
    /// struct ApiError {
    ///     code: String,
    ///     message: String,
    /// }
    ///
    /// if let Err(e) = users.get_me(None).await {
    ///     if let Some(Ok(api_error)) = e.decode_body::<ApiError>() {
    ///         println!("{}: {}", api_error.code, api_error.message);
    ///     }
    /// }
    /// ```
    pub fn decode_body<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Option<std::result::Result<T, Cause>> {
        self.body.as_ref().map(|body| {
            serde_json::from_value(serde_json::Value::Object(body.clone()))
                .map_err(Cause::JsonSerialization)
        })
    }
}
