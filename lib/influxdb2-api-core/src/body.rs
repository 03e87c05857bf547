//! Body serialization utilities.

use bytes::Bytes;

use crate::{Cause, Error, Result};

/// Generic JSON object decoded from an error response, kept for diagnostics.
pub type ErrorBody = serde_json::Map<String, serde_json::Value>;

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Multipart form content type (`multipart/form-data`), without boundary.
    MultipartFormData,
    /// Binary content type (`application/octet-stream`).
    OctetStream,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::MultipartFormData => "multipart/form-data",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an encoding error (code `415`) if JSON serialization fails.
///
/// # Example
///
/// ```
/// use influxdb2_api_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct PasswordResetBody { password: String }
///
/// let body = PasswordResetBody { password: "s3cret".to_string() };
/// let bytes = to_json(&body).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"password":"s3cret"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Error::encoding)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` so the returned [`Cause::JsonDeserialization`]
/// names the exact field that failed (e.g., "users[0].name").
///
/// # Example
///
/// ```
/// use influxdb2_api_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct IsOnboarding { allowed: bool }
///
/// let value: IsOnboarding = from_json(br#"{"allowed":true}"#).expect("deserialize");
/// assert_eq!(value, IsOnboarding { allowed: true });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> std::result::Result<T, Cause> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| Cause::JsonDeserialization {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

/// Best-effort decode of an error response body into a generic JSON object.
///
/// Returns `None` when there is no data, when it is not JSON, or when the JSON
/// is not an object. Never fails.
///
/// # Example
///
/// ```
/// use influxdb2_api_core::to_error_body;
///
/// let body = to_error_body(Some(br#"{"message":"not found"}"#)).expect("object");
/// assert_eq!(body["message"], "not found");
///
/// assert!(to_error_body(Some(b"<html>oops</html>")).is_none());
/// assert!(to_error_body(None).is_none());
/// ```
#[must_use]
pub fn to_error_body(data: Option<&[u8]>) -> Option<ErrorBody> {
    serde_json::from_slice(data?).ok()
}
