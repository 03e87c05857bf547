//! HTTP response handling.
//!
//! - [`RawResponse`] - whatever the transport produced for one attempt
//! - [`Response`] - status, headers and body; [`Envelope`] is the successful
//!   result of an API call and [`ResponseHead`] the status line plus headers

use std::collections::HashMap;

use bytes::Bytes;

use crate::TransportError;

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
}

/// Status and headers of a response.
pub type ResponseHead = Response<()>;

/// Successful result of an API call: status, headers and an optional body.
pub type Envelope<T> = Response<Option<T>>;

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, HashMap<String, String>, B) {
        (self.status, self.headers, self.body)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Transform the body with a function.
    pub fn map_body<F, B2>(self, f: F) -> Response<B2>
    where
        F: FnOnce(B) -> B2,
    {
        Response {
            status: self.status,
            headers: self.headers,
            body: f(self.body),
        }
    }

    /// Split into the head and the body.
    #[must_use]
    pub fn split(self) -> (ResponseHead, B) {
        (
            Response {
                status: self.status,
                headers: self.headers,
                body: (),
            },
            self.body,
        )
    }
}

/// Outcome of one transport call.
///
/// Any combination of the three fields is representable, including the
/// degenerate one where all are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    data: Option<Bytes>,
    head: Option<ResponseHead>,
    error: Option<TransportError>,
}

impl RawResponse {
    /// Build from raw parts.
    #[must_use]
    pub fn new(
        data: Option<Bytes>,
        head: Option<ResponseHead>,
        error: Option<TransportError>,
    ) -> Self {
        Self { data, head, error }
    }

    /// A response was received.
    #[must_use]
    pub fn completed(response: Response<Bytes>) -> Self {
        let (head, data) = response.split();
        Self {
            data: Some(data),
            head: Some(head),
            error: None,
        }
    }

    /// The transport failed before a response.
    #[must_use]
    pub fn failed(error: TransportError) -> Self {
        Self {
            data: None,
            head: None,
            error: Some(error),
        }
    }

    /// Body bytes, if any arrived.
    #[must_use]
    pub fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    /// Status and headers, if a response arrived.
    #[must_use]
    pub fn head(&self) -> Option<&ResponseHead> {
        self.head.as_ref()
    }

    /// Transport error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&TransportError> {
        self.error.as_ref()
    }

    /// Status code, if a response arrived.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.head.as_ref().map(Response::status)
    }

    /// Consume into (data, head, error).
    #[must_use]
    pub fn into_parts(self) -> (Option<Bytes>, Option<ResponseHead>, Option<TransportError>) {
        (self.data, self.head, self.error)
    }
}

impl From<Result<Response<Bytes>, TransportError>> for RawResponse {
    fn from(result: Result<Response<Bytes>, TransportError>) -> Self {
        match result {
            Ok(response) => Self::completed(response),
            Err(error) => Self::failed(error),
        }
    }
}
