//! File-download persistence.
//!
//! A download is written to `<dir>/<request path>[/<filename>]`, where the
//! request path is the percent-decoded URL path without its leading slash and
//! the filename comes from the `Content-Disposition` response header.

use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use percent_encoding::percent_decode_str;

use crate::DownloadError;

/// Extract the filename from a `Content-Disposition` header value.
///
/// Every `;`-separated item is scanned for `filename=`; quotes and
/// surrounding whitespace are stripped. Only the last path component of the
/// value is kept, and `.`/`..` are rejected.
///
/// ```
/// use influxdb2_api_core::filename_from_content_disposition;
///
/// assert_eq!(
///     filename_from_content_disposition(Some("attachment; filename=\"report.csv\"")),
///     Some("report.csv".to_string())
/// );
/// assert_eq!(filename_from_content_disposition(Some("inline")), None);
/// assert_eq!(filename_from_content_disposition(None), None);
/// ```
#[must_use]
pub fn filename_from_content_disposition(header: Option<&str>) -> Option<String> {
    header?
        .split(';')
        .find_map(|item| item.trim().strip_prefix("filename="))
        .map(|value| value.replace('"', ""))
        .and_then(|value| {
            let name = value.trim().rsplit(['/', '\\']).next().unwrap_or_default();
            match name {
                "" | "." | ".." => None,
                name => Some(name.to_string()),
            }
        })
}

/// Compute where a download for `url` is stored under `dir`.
///
/// Empty, `.` and `..` path segments are dropped, so the result always stays
/// inside `dir`.
///
/// # Errors
///
/// Returns [`DownloadError::RequestMissingPath`] when neither the URL path
/// nor `filename` names anything.
pub fn download_path(
    dir: &Path,
    url: &url::Url,
    filename: Option<&str>,
) -> Result<PathBuf, DownloadError> {
    let decoded = percent_decode_str(url.path()).decode_utf8_lossy();
    let relative: PathBuf = Path::new(decoded.as_ref())
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment),
            _ => None,
        })
        .chain(filename.map(std::ffi::OsStr::new))
        .collect();

    if relative.as_os_str().is_empty() {
        return Err(DownloadError::RequestMissingPath);
    }
    Ok(dir.join(relative))
}

/// Write downloaded bytes and return the path written.
///
/// Parent directories are created as needed. The file is written to a
/// temporary sibling first and renamed into place.
///
/// # Errors
///
/// Returns [`DownloadError::ResponseDataMissing`] without data, see
/// [`download_path`] for path errors, and [`DownloadError::Io`] when the
/// filesystem refuses.
pub fn persist_download(
    dir: &Path,
    url: &url::Url,
    content_disposition: Option<&str>,
    data: Option<&Bytes>,
) -> Result<PathBuf, DownloadError> {
    let data = data.ok_or(DownloadError::ResponseDataMissing)?;
    let filename = filename_from_content_disposition(content_disposition);
    let target = download_path(dir, url, filename.as_deref())?;

    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| DownloadError::Io { path, source }
    };

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let mut staging = target.clone().into_os_string();
    staging.push(format!(".{}.part", uuid::Uuid::new_v4().simple()));
    let staging = PathBuf::from(staging);

    std::fs::write(&staging, data).map_err(io_error(&staging))?;
    if let Err(source) = std::fs::rename(&staging, &target) {
        let _ = std::fs::remove_file(&staging);
        return Err(DownloadError::Io {
            path: target,
            source,
        });
    }

    Ok(target)
}
