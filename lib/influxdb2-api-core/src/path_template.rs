//! Endpoint path templates.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped in a substituted path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// An endpoint path with `{name}` placeholders, e.g. `/users/{userID}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathTemplate(&'static str);

impl PathTemplate {
    /// Create a new path template.
    #[must_use]
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    /// Get the template string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// Substitute placeholders with percent-encoded values.
    ///
    /// Each value is encoded as a single path segment, so a `/` inside a
    /// value cannot change the endpoint. The dot segments `.` and `..` are
    /// escaped to `%2E` and `%2E%2E`; URL parsing still treats those as dot
    /// segments, so the encoder refuses to send them. Placeholders without a
    /// value are left untouched.
    ///
    /// ```
    /// use influxdb2_api_core::PathTemplate;
    ///
    /// let path = PathTemplate::new("/orgs/{orgID}/secrets/{secretID}")
    ///     .expand([("orgID", "0a1b"), ("secretID", "db pass")]);
    /// assert_eq!(path, "/orgs/0a1b/secrets/db%20pass");
    /// ```
    #[must_use]
    pub fn expand<'a>(&self, params: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
        params
            .into_iter()
            .fold(self.0.to_string(), |path, (name, value)| {
                let encoded = match value {
                    "." => "%2E".to_string(),
                    ".." => "%2E%2E".to_string(),
                    _ => utf8_percent_encode(value, PATH_SEGMENT).to_string(),
                };
                path.replace(&format!("{{{name}}}"), &encoded)
            })
    }
}

/// Whether URL parsing would resolve `segment` as `.` or `..`.
pub(crate) fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "." | "%2e" | ".." | ".%2e" | "%2e." | "%2e%2e"
    )
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PathTemplate {
    fn as_ref(&self) -> &str {
        self.0
    }
}
