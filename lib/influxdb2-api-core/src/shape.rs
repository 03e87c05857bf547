//! Result shapes and response classification.
//!
//! Every API call declares what a successful body turns into by picking a
//! [`Shape`] marker type:
//!
//! | Shape | Output | On success |
//! |-------|--------|------------|
//! | [`NoContent`] | `()` | body ignored, envelope body absent |
//! | [`RawText`] | `String` | UTF-8 decode, empty string when absent or invalid |
//! | [`RawBytes`] | `Bytes` | raw bytes, possibly absent |
//! | [`FileDownload`] | `PathBuf` | bytes written under the download directory |
//! | [`Structured<T>`] | `T` | JSON decode; empty data is an error |
//!
//! [`process_response`] applies the same classification to every raw
//! response before the shape is consulted: transport error, missing
//! response, unsuccessful status, then the shape branch.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::{
    Cause, Envelope, Error, MISSING_RESPONSE, RawResponse, ResponseHead, Result, from_json,
    persist_download, to_error_body,
};

/// Tag naming the shape of a successful result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultShape {
    /// No body expected.
    NoContent,
    /// UTF-8 text.
    RawText,
    /// Raw bytes.
    RawBytes,
    /// Bytes persisted to a file.
    FileDownload,
    /// JSON decoded into a type.
    Structured,
}

/// Request-side context needed to finish a response.
#[derive(Debug, Clone, Copy)]
pub struct ResponseContext<'a> {
    /// URL the request was sent to.
    pub url: &'a url::Url,
    /// Directory downloads are written under.
    pub download_dir: &'a Path,
}

/// A result shape: how the body of a successful response is extracted.
pub trait Shape: Send + 'static {
    /// Extracted body type.
    type Output: Send + 'static;

    /// Tag of this shape.
    const KIND: ResultShape;

    /// Extract the body of a 2xx response.
    ///
    /// # Errors
    ///
    /// Returns an error when the data does not fit the shape.
    fn extract(
        head: &ResponseHead,
        data: Option<Bytes>,
        ctx: &ResponseContext<'_>,
    ) -> Result<Option<Self::Output>>;
}

/// No body expected.
#[derive(Debug, Clone, Copy)]
pub struct NoContent;

/// Body as UTF-8 text.
#[derive(Debug, Clone, Copy)]
pub struct RawText;

/// Body as raw bytes.
#[derive(Debug, Clone, Copy)]
pub struct RawBytes;

/// Body written to a file; the output is its path.
#[derive(Debug, Clone, Copy)]
pub struct FileDownload;

/// Body decoded from JSON into `T`.
pub struct Structured<T>(PhantomData<fn() -> T>);

impl<T> std::fmt::Debug for Structured<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Structured<{}>", std::any::type_name::<T>())
    }
}

impl Shape for NoContent {
    type Output = ();
    const KIND: ResultShape = ResultShape::NoContent;

    fn extract(_: &ResponseHead, _: Option<Bytes>, _: &ResponseContext<'_>) -> Result<Option<()>> {
        Ok(None)
    }
}

impl Shape for RawText {
    type Output = String;
    const KIND: ResultShape = ResultShape::RawText;

    fn extract(
        _: &ResponseHead,
        data: Option<Bytes>,
        _: &ResponseContext<'_>,
    ) -> Result<Option<String>> {
        let text = data
            .and_then(|bytes| String::from_utf8(bytes.to_vec()).ok())
            .unwrap_or_default();
        Ok(Some(text))
    }
}

impl Shape for RawBytes {
    type Output = Bytes;
    const KIND: ResultShape = ResultShape::RawBytes;

    fn extract(
        _: &ResponseHead,
        data: Option<Bytes>,
        _: &ResponseContext<'_>,
    ) -> Result<Option<Bytes>> {
        Ok(data)
    }
}

impl Shape for FileDownload {
    type Output = PathBuf;
    const KIND: ResultShape = ResultShape::FileDownload;

    fn extract(
        head: &ResponseHead,
        data: Option<Bytes>,
        ctx: &ResponseContext<'_>,
    ) -> Result<Option<PathBuf>> {
        persist_download(
            ctx.download_dir,
            ctx.url,
            head.header("Content-Disposition"),
            data.as_ref(),
        )
        .map(Some)
        .map_err(|e| {
            Error::download(e)
                .with_headers(head.headers().clone())
                .with_body(to_error_body(data.as_deref()))
        })
    }
}

impl<T> Shape for Structured<T>
where
    T: serde::de::DeserializeOwned + Send + 'static,
{
    type Output = T;
    const KIND: ResultShape = ResultShape::Structured;

    fn extract(
        head: &ResponseHead,
        data: Option<Bytes>,
        _: &ResponseContext<'_>,
    ) -> Result<Option<T>> {
        let Some(data) = data.filter(|bytes| !bytes.is_empty()) else {
            return Err(Error::new(i32::from(head.status()), Cause::EmptyData)
                .with_headers(head.headers().clone()));
        };

        from_json(&data).map(Some).map_err(|cause| {
            Error::new(i32::from(head.status()), cause)
                .with_headers(head.headers().clone())
                .with_body(to_error_body(Some(data.as_ref())))
        })
    }
}

/// Classify a raw response and extract the body for shape `S`.
///
/// # Errors
///
/// | Condition | Code | Cause |
/// |-----------|------|-------|
/// | transport error | `-1` | [`Cause::Transport`] |
/// | no response head | `-2` | [`Cause::MissingResponse`] |
/// | status outside `200..=299` | status | [`Cause::UnsuccessfulStatus`] |
/// | shape extraction failure | see [`Shape::extract`] | |
///
/// Errors built from a received response carry its headers and the body
/// decoded by [`to_error_body`].
pub fn process_response<S: Shape>(
    raw: RawResponse,
    ctx: &ResponseContext<'_>,
) -> Result<Envelope<S::Output>> {
    let (data, head, error) = raw.into_parts();

    if let Some(error) = error {
        return Err(Error::transport(error).with_body(to_error_body(data.as_deref())));
    }

    let Some(head) = head else {
        return Err(Error::new(MISSING_RESPONSE, Cause::MissingResponse)
            .with_body(to_error_body(data.as_deref())));
    };

    if !head.is_success() {
        return Err(Error::new(i32::from(head.status()), Cause::UnsuccessfulStatus)
            .with_body(to_error_body(data.as_deref()))
            .with_headers(head.into_parts().1));
    }

    let body = S::extract(&head, data, ctx)?;
    Ok(head.map_body(|()| body))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert2::{check, let_assert};

    use super::*;
    use crate::{Response, TransportError};

    fn ctx_parts() -> (url::Url, PathBuf) {
        (
            url::Url::parse("http://localhost:8086/api/v2/me").expect("valid URL"),
            PathBuf::from("/nonexistent-downloads"),
        )
    }

    fn ok(status: u16, body: &'static [u8]) -> RawResponse {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        RawResponse::completed(Response::new(status, headers, Bytes::from_static(body)))
    }

    fn run<S: Shape>(raw: RawResponse) -> Result<Envelope<S::Output>> {
        let (url, dir) = ctx_parts();
        process_response::<S>(
            raw,
            &ResponseContext {
                url: &url,
                download_dir: &dir,
            },
        )
    }

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Me {
        name: String,
    }

    #[test]
    fn shape_tags() {
        check!(NoContent::KIND == ResultShape::NoContent);
        check!(RawText::KIND == ResultShape::RawText);
        check!(RawBytes::KIND == ResultShape::RawBytes);
        check!(FileDownload::KIND == ResultShape::FileDownload);
        check!(Structured::<Me>::KIND == ResultShape::Structured);
    }

    #[test]
    fn transport_error_wins() {
        let raw = RawResponse::new(
            Some(Bytes::from_static(br#"{"message":"partial"}"#)),
            None,
            Some(TransportError::Connection("reset".to_string())),
        );

        let_assert!(Err(err) = run::<NoContent>(raw));
        check!(err.code() == -1);
        check!(err.is_transport());
        check!(err.headers().is_none());
        check!(err.body().and_then(|b| b.get("message")) == Some(&serde_json::json!("partial")));
    }

    #[test]
    fn missing_head() {
        let_assert!(Err(err) = run::<RawText>(RawResponse::default()));
        check!(err.code() == -2);
        check!(matches!(err.cause(), Cause::MissingResponse));
        check!(err.body().is_none());
    }

    #[test]
    fn missing_head_keeps_stray_body() {
        let data = Bytes::from_static(br#"{"message":"no head"}"#);
        let_assert!(Err(err) = run::<RawText>(RawResponse::new(Some(data), None, None)));
        check!(err.code() == -2);
        check!(matches!(err.cause(), Cause::MissingResponse));
        let_assert!(Some(body) = err.body());
        check!(body.get("message") == Some(&serde_json::json!("no head")));
    }

    #[test]
    fn unsuccessful_status_with_body() {
        let_assert!(Err(err) = run::<Structured<Me>>(ok(404, br#"{"message":"not found"}"#)));
        check!(err.code() == 404);
        check!(matches!(err.cause(), Cause::UnsuccessfulStatus));
        check!(err.headers().is_some());
        let_assert!(Some(body) = err.body());
        check!(body.get("message") == Some(&serde_json::json!("not found")));
    }

    #[test]
    fn unsuccessful_status_without_json() {
        let_assert!(Err(err) = run::<NoContent>(ok(503, b"<html>down</html>")));
        check!(err.code() == 503);
        check!(err.body().is_none());
    }

    #[test]
    fn redirect_is_not_success() {
        let_assert!(Err(err) = run::<NoContent>(ok(302, b"")));
        check!(err.code() == 302);
    }

    #[test]
    fn no_content_ignores_body() {
        let_assert!(Ok(envelope) = run::<NoContent>(ok(204, b"")));
        check!(envelope.status() == 204);
        check!(envelope.body().is_none());

        let_assert!(Ok(envelope) = run::<NoContent>(ok(200, b"{\"ignored\":true}")));
        check!(envelope.body().is_none());
    }

    #[test]
    fn raw_text() {
        let_assert!(Ok(envelope) = run::<RawText>(ok(200, "héllo".as_bytes())));
        check!(envelope.body().as_deref() == Some("héllo"));

        let_assert!(Ok(envelope) = run::<RawText>(ok(200, &[0xFF, 0xFE])));
        check!(envelope.body().as_deref() == Some(""));
    }

    #[test]
    fn raw_bytes() {
        let_assert!(Ok(envelope) = run::<RawBytes>(ok(200, &[1, 2, 3])));
        check!(envelope.into_body() == Some(Bytes::from_static(&[1, 2, 3])));
    }

    #[test]
    fn structured_decodes() {
        let_assert!(Ok(envelope) = run::<Structured<Me>>(ok(200, br#"{"name":"admin"}"#)));
        check!(envelope.status() == 200);
        check!(envelope.header("content-type") == Some("application/json"));
        check!(
            envelope.into_body()
                == Some(Me {
                    name: "admin".to_string()
                })
        );
    }

    #[test]
    fn structured_empty_data() {
        let_assert!(Err(err) = run::<Structured<Me>>(ok(200, b"")));
        check!(err.code() == 200);
        check!(matches!(err.cause(), Cause::EmptyData));
        check!(err.headers().is_some());
        check!(err.body().is_none());
    }

    #[test]
    fn structured_decode_failure_keeps_status_and_body() {
        let_assert!(Err(err) = run::<Structured<Me>>(ok(201, br#"{"name":42}"#)));
        check!(err.code() == 201);
        let_assert!(Cause::JsonDeserialization { path, .. } = err.cause());
        check!(path == "name");
        check!(err.body().and_then(|b| b.get("name")) == Some(&serde_json::json!(42)));
    }

    #[test]
    fn file_download() {
        let dir = tempfile::tempdir().expect("temp dir");
        let url = url::Url::parse("http://localhost:8086/api/v2/files/7").expect("valid URL");
        let mut headers = HashMap::new();
        headers.insert(
            "content-disposition".to_string(),
            "attachment; filename=\"out.csv\"".to_string(),
        );
        let raw = RawResponse::completed(Response::new(200, headers, Bytes::from_static(b"a,b")));

        let ctx = ResponseContext {
            url: &url,
            download_dir: dir.path(),
        };
        let_assert!(Ok(envelope) = process_response::<FileDownload>(raw, &ctx));
        let_assert!(Some(path) = envelope.into_body());
        check!(path == dir.path().join("api/v2/files/7/out.csv"));
        check!(std::fs::read(path).expect("readable") == b"a,b");
    }

    #[test]
    fn file_download_failure_is_400() {
        let dir = tempfile::tempdir().expect("temp dir");
        let url = url::Url::parse("http://localhost:8086/").expect("valid URL");
        let response = Response::new(200, HashMap::new(), Bytes::from_static(b"x"));
        let raw = RawResponse::completed(response);

        let ctx = ResponseContext {
            url: &url,
            download_dir: dir.path(),
        };
        let_assert!(Err(err) = process_response::<FileDownload>(raw, &ctx));
        check!(err.code() == 400);
        check!(matches!(err.cause(), Cause::Download(_)));
        check!(err.headers().is_some());
    }
}
