//! Multipart form data support for file uploads.
//!
//! A [`Form`] is usually built from a [`Parameters`] list with
//! [`Form::from_parameters`]: file values become file parts, everything else
//! becomes a plain text field.
//!
//! # Example
//!
//! ```
//! use influxdb2_api_core::{Form, Part};
//!
//! let form = Form::with_boundary("Boundary-1")
//!     .part(Part::text("bucket", "telegraf"))
//!     .part(Part::file("data", "cpu.csv", "time,value\n"));
//!
//! let (content_type, body) = form.into_body();
//! assert_eq!(content_type, "multipart/form-data; boundary=Boundary-1");
//! assert!(body.ends_with(b"\r\n--Boundary-1--\r\n"));
//! ```

use std::path::Path;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{Cause, ContentType, Error, FormPartContentType, ParamValue, Parameters, Result};

/// A single part in a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl Part {
    /// Create a new part with the given name and data.
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            data: data.into(),
        }
    }

    /// Create a text field. Text fields carry no `Content-Type`.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Bytes::from(value.into()))
    }

    /// Create a file part with filename.
    ///
    /// The content type is guessed from the filename extension, or defaults
    /// to `application/octet-stream` if unknown.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let filename = filename.into();
        let content_type = guess_content_type(&filename);
        Self {
            name: name.into(),
            filename: Some(filename),
            content_type: Some(content_type),
            data: data.into(),
        }
    }

    /// Read a local file into a file part.
    ///
    /// The filename is the last path component. `content_type_for` overrides
    /// the extension lookup when it returns a value.
    ///
    /// # Errors
    ///
    /// Returns a [`Cause::MissingFile`] error (code `415`) if the file cannot
    /// be read.
    pub fn from_path(
        name: impl Into<String>,
        path: &Path,
        content_type_for: Option<&FormPartContentType>,
    ) -> Result<Self> {
        let data = std::fs::read(path).map_err(|source| {
            Error::encoding(Cause::MissingFile {
                path: path.to_path_buf(),
                source,
            })
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let part = Self::file(name, filename, data);
        Ok(match content_type_for.and_then(|hook| hook(path)) {
            Some(content_type) => part.with_content_type(content_type),
            None => part,
        })
    }

    /// Set the filename for this part.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the content type for this part.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Get the part name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the filename, if set.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Get the content type, if set.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Get the part data.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

/// Guess a MIME type from a filename extension.
///
/// Unknown or missing extensions map to `application/octet-stream`.
#[must_use]
pub fn guess_content_type(filename: &str) -> String {
    let extension = Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        // Documents
        "pdf" => "application/pdf",
        // Text and data
        "txt" | "lp" => "text/plain",
        "html" | "htm" => "text/html",
        "json" => ContentType::Json.as_str(),
        "xml" => "application/xml",
        "csv" => "text/csv",
        "md" => "text/markdown",
        "yaml" | "yml" => "application/yaml",
        "toml" => "application/toml",
        "flux" => "application/vnd.flux",
        // Archives
        "zip" => "application/zip",
        "tar" => "application/x-tar",
        "gz" | "gzip" => "application/gzip",
        _ => ContentType::OctetStream.as_str(),
    }
    .to_string()
}

/// A multipart form containing multiple parts.
#[derive(Debug, Clone)]
pub struct Form {
    parts: Vec<Part>,
    boundary: String,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    /// Create a new empty form with a fresh `Boundary-<uuid>` boundary.
    #[must_use]
    pub fn new() -> Self {
        Self::with_boundary(format!("Boundary-{}", uuid::Uuid::new_v4()))
    }

    /// Create a new form with a custom boundary.
    ///
    /// The boundary should be a unique string that doesn't appear in any part data.
    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            parts: Vec::new(),
            boundary: boundary.into(),
        }
    }

    /// Build a form from parameters, in their order.
    ///
    /// Files are read eagerly.
    ///
    /// # Errors
    ///
    /// Returns a [`Cause::MissingFile`] error (code `415`) if a file
    /// parameter cannot be read.
    pub fn from_parameters(
        params: &Parameters,
        content_type_for: Option<&FormPartContentType>,
    ) -> Result<Self> {
        params.iter().try_fold(Self::new(), |form, (name, value)| {
            let part = match value {
                ParamValue::File(path) => Part::from_path(name, path, content_type_for)?,
                scalar => Part::text(name, scalar.to_string()),
            };
            Ok(form.part(part))
        })
    }

    /// Add a part to the form.
    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Add a text field to the form.
    #[must_use]
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.part(Part::text(name, value))
    }

    /// Add a file to the form.
    #[must_use]
    pub fn file(
        self,
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.part(Part::file(name, filename, data))
    }

    /// Get the boundary string.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Get the parts in this form.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns `multipart/form-data; boundary=<boundary>`.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("{}; boundary={}", ContentType::MultipartFormData, self.boundary)
    }

    /// Convert the form into (content-type header value, body bytes).
    #[must_use]
    pub fn into_body(self) -> (String, Bytes) {
        let content_type = self.content_type();
        let body = self.encode();
        (content_type, body)
    }

    fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();

        for (index, part) in self.parts.iter().enumerate() {
            if index > 0 {
                buf.put_slice(b"\r\n");
            }

            buf.put_slice(b"--");
            buf.put_slice(self.boundary.as_bytes());
            buf.put_slice(b"\r\n");

            buf.put_slice(b"Content-Disposition: form-data; name=\"");
            buf.put_slice(part.name.as_bytes());
            buf.put_slice(b"\"");
            if let Some(filename) = &part.filename {
                buf.put_slice(b"; filename=\"");
                buf.put_slice(filename.as_bytes());
                buf.put_slice(b"\"");
            }
            buf.put_slice(b"\r\n");

            if let Some(content_type) = &part.content_type {
                buf.put_slice(b"Content-Type: ");
                buf.put_slice(content_type.as_bytes());
                buf.put_slice(b"\r\n");
            }

            buf.put_slice(b"\r\n");
            buf.put_slice(&part.data);
        }

        buf.put_slice(b"\r\n--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"--\r\n");

        buf.freeze()
    }
}
