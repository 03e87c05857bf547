//! Request descriptors: one logical API call before encoding.

use std::collections::HashMap;

use bytes::Bytes;

use crate::{EncodingStrategy, Method, ParamValue, Parameters, Result, to_json};

/// What a request carries besides its URL query.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    /// No parameters and no body.
    #[default]
    Empty,
    /// Scalar and file parameters. Sent as a query string, or as a
    /// multipart body when a file is present.
    Parameters(Parameters),
    /// A JSON document, already serialized.
    Json(Bytes),
}

/// Everything needed to build one wire request.
///
/// The URL already has its path parameters substituted. Descriptors are
/// immutable once built and can be encoded any number of times, which is
/// what retries rely on.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    url: String,
    query: Parameters,
    headers: HashMap<String, String>,
    payload: Payload,
}

impl RequestDescriptor {
    /// Start building a descriptor.
    #[must_use]
    pub fn builder(method: Method, url: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder {
            inner: Self {
                method,
                url: url.into(),
                query: Parameters::new(),
                headers: HashMap::new(),
                payload: Payload::Empty,
            },
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Target URL, without the query parameters.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query parameters, always sent in the URL.
    #[must_use]
    pub const fn query(&self) -> &Parameters {
        &self.query
    }

    /// Caller headers.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// The payload.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns `true` when the payload is a JSON document.
    #[must_use]
    pub const fn is_body(&self) -> bool {
        matches!(self.payload, Payload::Json(_))
    }

    /// Encoding strategy the payload calls for.
    #[must_use]
    pub fn strategy(&self) -> EncodingStrategy {
        EncodingStrategy::select(&self.payload)
    }
}

/// Builder for [`RequestDescriptor`].
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    inner: RequestDescriptor,
}

impl DescriptorBuilder {
    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.inner.query.push(name, value);
        self
    }

    /// Append a query parameter if present.
    #[must_use]
    pub fn query_opt<V: Into<ParamValue>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    /// Set a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.headers.insert(name.into(), value.into());
        self
    }

    /// Set a header if present.
    #[must_use]
    pub fn header_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.header(name, value),
            None => self,
        }
    }

    /// Replace the payload with a parameter list.
    #[must_use]
    pub fn form(mut self, params: Parameters) -> Self {
        self.inner.payload = Payload::Parameters(params);
        self
    }

    /// Append one payload parameter.
    ///
    /// A previous JSON payload is discarded.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        match &mut self.inner.payload {
            Payload::Parameters(params) => params.push(name, value),
            other => *other = Payload::Parameters(Parameters::new().with(name, value)),
        }
        self
    }

    /// Serialize `body` as the JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an encoding error (code `415`) if `body` cannot be
    /// represented as JSON.
    pub fn json<T: serde::Serialize + ?Sized>(self, body: &T) -> Result<Self> {
        let bytes = to_json(body)?;
        Ok(self.json_bytes(bytes))
    }

    /// Use already serialized JSON as the payload.
    #[must_use]
    pub fn json_bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.inner.payload = Payload::Json(body.into());
        self
    }

    /// Finish the descriptor.
    #[must_use]
    pub fn build(self) -> RequestDescriptor {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use assert2::{check, let_assert};

    use super::*;
    use crate::{Cause, ToQueryPairs};

    const API: &str = "http://localhost:8086/api/v2";

    #[test]
    fn builder_defaults() {
        let descriptor = RequestDescriptor::builder(Method::Get, format!("{API}/me")).build();

        check!(descriptor.method() == Method::Get);
        check!(descriptor.url() == "http://localhost:8086/api/v2/me");
        check!(descriptor.query().is_empty());
        check!(descriptor.headers().is_empty());
        check!(descriptor.payload() == &Payload::Empty);
        check!(!descriptor.is_body());
        check!(descriptor.strategy() == EncodingStrategy::Query);
    }

    #[test]
    fn optional_query_and_headers_are_skipped() {
        let descriptor = RequestDescriptor::builder(Method::Get, format!("{API}/users"))
            .query_opt("offset", Some(5))
            .query_opt("after", None::<&str>)
            .query_opt("limit", Some(10))
            .header_opt("Zap-Trace-Span", None::<String>)
            .build();

        check!(
            descriptor.query().to_query_pairs()
                == vec![
                    ("offset".to_string(), "5".to_string()),
                    ("limit".to_string(), "10".to_string()),
                ]
        );
        check!(descriptor.headers().is_empty());
    }

    #[test]
    fn json_payload() {
        let descriptor = RequestDescriptor::builder(Method::Patch, format!("{API}/users/1"))
            .json(&serde_json::json!({"key1": "value1"}))
            .expect("serializable")
            .build();

        check!(descriptor.is_body());
        check!(descriptor.strategy() == EncodingStrategy::Json);
        let_assert!(Payload::Json(bytes) = descriptor.payload());
        check!(bytes.as_ref() == br#"{"key1":"value1"}"#);
    }

    #[test]
    fn unserializable_json_fails_with_415() {
        let mut map = HashMap::new();
        map.insert((1, 1), 1);

        let builder = RequestDescriptor::builder(Method::Post, API);
        let_assert!(Err(err) = builder.json(&map));
        check!(err.code() == 415);
        check!(matches!(err.cause(), Cause::JsonSerialization(_)));
    }

    #[test]
    fn param_replaces_json_payload() {
        let descriptor = RequestDescriptor::builder(Method::Post, format!("{API}/write"))
            .json_bytes(Bytes::from_static(b"{}"))
            .param("bucket", "telegraf")
            .param("precision", "s")
            .build();

        check!(!descriptor.is_body());
        let_assert!(Payload::Parameters(params) = descriptor.payload());
        check!(params.len() == 2);
    }

    #[test]
    fn file_param_selects_multipart() {
        let descriptor = RequestDescriptor::builder(Method::Post, "http://localhost:8086/upload")
            .param("name", "cpu")
            .param("file", PathBuf::from("cpu.csv"))
            .build();

        check!(descriptor.strategy() == EncodingStrategy::Multipart);
    }
}
