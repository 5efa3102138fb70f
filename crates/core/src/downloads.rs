//! Download validation, filename resolution, and storage key helpers.
//!
//! Pure string-level helpers shared by the fetch worker and the HTTP
//! handlers. Network-level concerns (probing, error classification) live in
//! `clookit-worker`.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CoreError;
use crate::types::DbId;

/// Fallback filename when neither the response headers nor the URL yield one.
pub const DEFAULT_FILENAME: &str = "download";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that a download URL is non-empty and starts with `http`.
pub fn validate_download_url(url: &str) -> Result<(), CoreError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Download URL must not be empty".to_string(),
        ));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(CoreError::Validation(format!(
            "Download URL must start with http:// or https://, got: '{trimmed}'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Filename resolution
// ---------------------------------------------------------------------------

/// Extract a filename from a URL by taking the last path segment.
///
/// Strips query parameters and fragments. Falls back to
/// [`DEFAULT_FILENAME`] if no meaningful segment is found.
pub fn filename_from_url(url: &str) -> String {
    // Strip query string and fragment
    let clean = url.split('?').next().unwrap_or(url);
    let clean = clean.split('#').next().unwrap_or(clean);

    // Strip scheme and domain to get the path only
    let path = if let Some(rest) = clean
        .strip_prefix("https://")
        .or_else(|| clean.strip_prefix("http://"))
    {
        rest.find('/').map(|i| &rest[i..]).unwrap_or("")
    } else {
        clean
    };

    path.rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_FILENAME)
        .to_string()
}

/// Extract the filename parameter from a `Content-Disposition` header value.
///
/// Handles both quoted (`filename="report.pdf"`) and bare
/// (`filename=report.pdf`) forms. Returns `None` when the parameter is
/// absent or empty.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    static FILENAME_RE: OnceLock<Regex> = OnceLock::new();
    let re = FILENAME_RE.get_or_init(|| {
        Regex::new(r#"filename[^;=\n]*=\s*(?:"([^"\n]*)"|'([^'\n]*)'|([^;\n]*))"#).unwrap()
    });

    let caps = re.captures(header)?;
    let raw = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().trim())?;

    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Resolve the filename for a fetched resource.
///
/// Prefers a well-formed `Content-Disposition` hint, falls back to the last
/// path segment of the URL.
pub fn resolve_filename(content_disposition: Option<&str>, url: &str) -> String {
    content_disposition
        .and_then(filename_from_content_disposition)
        .unwrap_or_else(|| filename_from_url(url))
}

// ---------------------------------------------------------------------------
// Storage keys
// ---------------------------------------------------------------------------

/// Object key for a fetched resource: `{user_id}/downloads/{job_id}/{filename}`.
pub fn download_object_key(user_id: DbId, job_id: DbId, filename: &str) -> String {
    format!("{user_id}/downloads/{job_id}/{filename}")
}

/// Object key for a generated artifact:
/// `generations/{user_id}/tattoo_{timestamp_ms}_{index}.png`.
pub fn generation_object_key(user_id: DbId, timestamp_ms: i64, index: usize) -> String {
    format!("generations/{user_id}/tattoo_{timestamp_ms}_{index}.png")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
