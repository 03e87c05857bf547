//! Parameter encoding: turns a [`RequestDescriptor`] into a wire [`Request`].

use std::collections::HashMap;
use std::path::Path;

use bytes::Bytes;

use crate::path_template::is_dot_segment;
use crate::{
    ContentType, Error, Form, Parameters, Payload, Request, RequestDescriptor, Result,
    ToQueryPairs,
};

/// Hook that picks the `Content-Type` of a multipart file part.
///
/// Returning `None` falls back to the extension lookup.
pub type FormPartContentType = dyn Fn(&Path) -> Option<String> + Send + Sync;

/// How the payload is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingStrategy {
    /// Parameters appended to the URL query string.
    Query,
    /// JSON request body.
    Json,
    /// `multipart/form-data` request body.
    Multipart,
}

impl EncodingStrategy {
    /// Pick the strategy for a payload.
    ///
    /// Any file parameter forces multipart; otherwise a JSON payload is sent
    /// as a body and everything else goes to the query string.
    #[must_use]
    pub fn select(payload: &Payload) -> Self {
        match payload {
            Payload::Parameters(params) if params.has_files() => Self::Multipart,
            Payload::Json(_) => Self::Json,
            Payload::Empty | Payload::Parameters(_) => Self::Query,
        }
    }
}

/// Builds wire requests from descriptors.
///
/// Header precedence, lowest first: base headers, caller headers, headers
/// computed by the encoder (`Content-Type`).
#[derive(Clone, Copy)]
pub struct ParameterEncoder<'a> {
    base_headers: &'a HashMap<String, String>,
    content_type_for_part: Option<&'a FormPartContentType>,
}

impl std::fmt::Debug for ParameterEncoder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterEncoder")
            .field("base_headers", &self.base_headers)
            .field("content_type_for_part", &self.content_type_for_part.is_some())
            .finish()
    }
}

impl<'a> ParameterEncoder<'a> {
    /// Create an encoder with the given base headers.
    #[must_use]
    pub const fn new(base_headers: &'a HashMap<String, String>) -> Self {
        Self {
            base_headers,
            content_type_for_part: None,
        }
    }

    /// Install a hook overriding the content type of file parts.
    #[must_use]
    pub const fn with_form_part_content_type(mut self, hook: &'a FormPartContentType) -> Self {
        self.content_type_for_part = Some(hook);
        self
    }

    /// Encode a descriptor.
    ///
    /// Multipart bodies get a fresh boundary on every call.
    ///
    /// # Errors
    ///
    /// Returns an error with code `415` when the URL does not parse, its path
    /// holds a `.` or `..` segment, or a file parameter cannot be read.
    pub fn encode(&self, descriptor: &RequestDescriptor) -> Result<Request<Bytes>> {
        reject_dot_segments(descriptor.url())?;
        let mut url = url::Url::parse(descriptor.url()).map_err(Error::encoding)?;
        append_query(&mut url, descriptor.query());

        let mut request = Request::new(descriptor.method(), url);
        for (name, value) in self.base_headers.iter().chain(descriptor.headers()) {
            request.set_header(name.as_str(), value.as_str());
        }

        match (descriptor.strategy(), descriptor.payload()) {
            (EncodingStrategy::Multipart, Payload::Parameters(params)) => {
                let form = Form::from_parameters(params, self.content_type_for_part)?;
                let (content_type, body) = form.into_body();
                request.set_header(http::header::CONTENT_TYPE.as_str(), content_type);
                request.set_body(body);
            }
            (EncodingStrategy::Json, Payload::Json(body)) => {
                request.set_header(http::header::CONTENT_TYPE.as_str(), ContentType::Json.as_str());
                request.set_body(body.clone());
            }
            (_, Payload::Parameters(params)) => append_query(request.url_mut(), params),
            (_, Payload::Empty | Payload::Json(_)) => {}
        }

        Ok(request)
    }
}

/// Parsing resolves dot segments, which would retarget the request at a
/// parent resource.
fn reject_dot_segments(raw: &str) -> Result<()> {
    let after_scheme = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let path = after_scheme
        .find('/')
        .and_then(|start| after_scheme.get(start..))
        .unwrap_or_default();
    let path = path.split(['?', '#']).next().unwrap_or_default();

    if path.split('/').any(is_dot_segment) {
        return Err(Error::invalid_request(format!("dot segment in request path `{path}`")));
    }
    Ok(())
}

/// Append scalar parameters after any existing query items.
fn append_query(url: &mut url::Url, params: &Parameters) {
    let pairs = params.to_query_pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
}
