//! Shared configuration for API calls.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::runtime::Handle;

use crate::{Error, HyperClient, Result, Transport};

/// Path prefix of every API v2 endpoint.
pub const API_PREFIX: &str = "/api/v2";

/// Immutable configuration shared by every request of a client.
///
/// Cheap to clone. Holds the server base path, headers sent on every
/// request, the transport, the runtime completions are dispatched on and
/// the directory downloads are written to.
///
/// # Example
///
/// ```ignore
/// use influxdb2_api::ApiConfig;
///
/// let config = ApiConfig::builder("http://localhost:8086")
///     .header("Authorization", "Token my-token")
///     .build()?;
/// ```
#[derive(Clone)]
pub struct ApiConfig {
    inner: Arc<Inner>,
}

struct Inner {
    base_path: String,
    headers: HashMap<String, String>,
    transport: Arc<dyn Transport>,
    dispatch: Handle,
    download_dir: PathBuf,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_path", &self.inner.base_path)
            .field("headers", &self.inner.headers.keys().collect::<Vec<_>>())
            .field("download_dir", &self.inner.download_dir)
            .finish_non_exhaustive()
    }
}

impl ApiConfig {
    /// Start building a configuration for the server at `base_path`.
    #[must_use]
    pub fn builder(base_path: impl Into<String>) -> ApiConfigBuilder {
        ApiConfigBuilder {
            base_path: base_path.into(),
            headers: HashMap::new(),
            transport: None,
            dispatch: None,
            download_dir: None,
        }
    }

    /// Server base path, without trailing slash.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.inner.base_path
    }

    /// Headers sent on every request.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.inner.headers
    }

    /// The transport.
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    /// Runtime completions are dispatched on by default.
    #[must_use]
    pub fn dispatch(&self) -> &Handle {
        &self.inner.dispatch
    }

    /// Directory file downloads are written under.
    #[must_use]
    pub fn download_dir(&self) -> &Path {
        &self.inner.download_dir
    }

    /// Full URL of an API v2 endpoint: `<base path>/api/v2<path>`.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.inner.base_path)
    }
}

/// Builder for [`ApiConfig`].
pub struct ApiConfigBuilder {
    base_path: String,
    headers: HashMap<String, String>,
    transport: Option<Arc<dyn Transport>>,
    dispatch: Option<Handle>,
    download_dir: Option<PathBuf>,
}

impl std::fmt::Debug for ApiConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfigBuilder")
            .field("base_path", &self.base_path)
            .field("custom_transport", &self.transport.is_some())
            .field("download_dir", &self.download_dir)
            .finish_non_exhaustive()
    }
}

impl ApiConfigBuilder {
    /// Add a header sent on every request.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Use a custom transport instead of a default [`HyperClient`].
    #[must_use]
    pub fn transport(mut self, transport: impl Transport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Use an already shared transport.
    #[must_use]
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Runtime that runs requests and their completions.
    ///
    /// Defaults to the runtime `build` is called from.
    #[must_use]
    pub fn dispatch(mut self, handle: Handle) -> Self {
        self.dispatch = Some(handle);
        self
    }

    /// Directory file downloads are written under.
    ///
    /// Defaults to the user's documents directory, or the temporary
    /// directory where there is none.
    #[must_use]
    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an invalid configuration error (code `0`) when the base path
    /// is not an absolute `http`/`https` URL, or when no dispatch runtime was
    /// given and `build` runs outside a tokio runtime.
    pub fn build(self) -> Result<ApiConfig> {
        let base_path = self.base_path.trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&base_path)
            .map_err(|e| Error::invalid_config(format!("invalid base path '{base_path}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::invalid_config(format!(
                "unsupported scheme '{}' in base path",
                parsed.scheme()
            )));
        }

        let dispatch = match self.dispatch {
            Some(handle) => handle,
            None => Handle::try_current()
                .map_err(|e| Error::invalid_config(format!("no dispatch runtime: {e}")))?,
        };

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(HyperClient::new()));

        let download_dir = self
            .download_dir
            .or_else(dirs::document_dir)
            .unwrap_or_else(std::env::temp_dir);

        Ok(ApiConfig {
            inner: Arc::new(Inner {
                base_path,
                headers: self.headers,
                transport,
                dispatch,
                download_dir,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::Cause;

    #[tokio::test]
    async fn defaults() {
        let config = ApiConfig::builder("http://localhost:8086/")
            .header("Authorization", "Token t")
            .build()
            .expect("valid config");

        check!(config.base_path() == "http://localhost:8086");
        check!(config.api_url("/me") == "http://localhost:8086/api/v2/me");
        check!(config.headers().get("Authorization").map(String::as_str) == Some("Token t"));
        check!(!config.download_dir().as_os_str().is_empty());
    }

    #[tokio::test]
    async fn base_path_with_prefix() {
        let config = ApiConfig::builder("https://example.com/influx")
            .download_dir("/tmp/influx")
            .build()
            .expect("valid config");

        check!(config.api_url("/setup") == "https://example.com/influx/api/v2/setup");
        check!(config.download_dir() == Path::new("/tmp/influx"));
    }

    #[tokio::test]
    async fn rejects_bad_base_path() {
        let_assert!(Err(err) = ApiConfig::builder("localhost:8086").build());
        check!(err.code() == 0);
        check!(matches!(err.cause(), Cause::InvalidConfig(_)));

        let_assert!(Err(err) = ApiConfig::builder("not a url").build());
        check!(err.code() == 0);
    }

    #[test]
    fn requires_runtime_without_dispatch() {
        let_assert!(Err(err) = ApiConfig::builder("http://localhost:8086").build());
        check!(err.code() == 0);
        check!(err.to_string().contains("no dispatch runtime"));
    }

    #[test]
    fn explicit_dispatch_outside_runtime() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");

        let config = ApiConfig::builder("http://localhost:8086")
            .dispatch(runtime.handle().clone())
            .build();
        check!(config.is_ok());
    }
}
