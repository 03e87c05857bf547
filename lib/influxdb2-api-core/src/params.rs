//! Request parameters: scalar values and file references.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::ToQueryPairs;

/// A single parameter value.
///
/// Scalars are serialized one level deep; there is no special handling of
/// nested or array values.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Text value, sent as-is.
    Text(String),
    /// Numeric value, sent in its canonical decimal form.
    Number(serde_json::Number),
    /// Boolean value, sent as `true` / `false`.
    Bool(bool),
    /// Local file, uploaded as a multipart file part.
    File(PathBuf),
}

impl ParamValue {
    /// Returns `true` for file references.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// String form of a scalar value, `None` for files.
    #[must_use]
    pub fn as_scalar(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Number(number) => Some(number.to_string()),
            Self::Bool(flag) => Some(flag.to_string()),
            Self::File(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Number(serde_json::Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map_or_else(|| Self::Text(value.to_string()), Self::Number)
    }
}

impl From<PathBuf> for ParamValue {
    fn from(value: PathBuf) -> Self {
        Self::File(value)
    }
}

impl From<&Path> for ParamValue {
    fn from(value: &Path) -> Self {
        Self::File(value.to_path_buf())
    }
}

/// Ordered parameter list.
///
/// Insertion order is preserved and drives both query-string order and
/// multipart part order. Absent values are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(Vec<(String, ParamValue)>);

impl Parameters {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Append a parameter when present; `None` is omitted, not sent empty.
    #[must_use]
    pub fn with_opt<V: Into<ParamValue>>(
        mut self,
        name: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        if let Some(value) = value {
            self.push(name, value);
        }
        self
    }

    /// Append a parameter in place.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.push((name.into(), value.into()));
    }

    /// Returns `true` if any value is a file reference.
    #[must_use]
    pub fn has_files(&self) -> bool {
        self.0.iter().any(|(_, value)| value.is_file())
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl ToQueryPairs for Parameters {
    fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter_map(|(name, value)| value.as_scalar().map(|v| (name.clone(), v)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_canonical_forms() {
        assert_eq!(ParamValue::from(5).as_scalar().as_deref(), Some("5"));
        assert_eq!(ParamValue::from(-20_i64).as_scalar().as_deref(), Some("-20"));
        assert_eq!(ParamValue::from(1.5).as_scalar().as_deref(), Some("1.5"));
        assert_eq!(ParamValue::from(true).as_scalar().as_deref(), Some("true"));
        assert_eq!(ParamValue::from("abc").as_scalar().as_deref(), Some("abc"));
        assert_eq!(ParamValue::from(f64::NAN).as_scalar().as_deref(), Some("NaN"));
    }

    #[test]
    fn file_is_not_scalar() {
        let value = ParamValue::from(PathBuf::from("/tmp/data.csv"));
        assert!(value.is_file());
        assert!(value.as_scalar().is_none());
    }

    #[test]
    fn absent_values_are_skipped() {
        let params = Parameters::new()
            .with_opt("offset", Some(5))
            .with_opt("after", None::<String>)
            .with_opt("limit", Some(10));

        assert_eq!(params.len(), 2);
        assert_eq!(
            params.to_query_pairs(),
            vec![
                ("offset".to_string(), "5".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn insertion_order_is_kept() {
        let params: Parameters = [("z", "1"), ("a", "2"), ("m", "3")].into_iter().collect();
        let names: Vec<&str> = params.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["z", "a", "m"]);
    }

    #[test]
    fn has_files() {
        let params = Parameters::new().with("name", "cpu");
        assert!(!params.has_files());

        let params = params.with("file", PathBuf::from("cpu.csv"));
        assert!(params.has_files());
    }
}
