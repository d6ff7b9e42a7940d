//! URL and storage-key helpers.
//!
//! Provides consistent URL handling across the codebase:
//! - External reference detection (scheme, protocol-relative, data URIs)
//! - Query/fragment splitting for CSS references
//! - Storage key normalization

/// Check whether a CSS reference must be left untouched.
///
/// External references are `http://`, `https://`, protocol-relative `//`
/// and `data:` URIs.
///
/// # Examples
/// ```
/// use assetpush::utils::path::is_external_url;
/// assert!(is_external_url("https://cdn.example.com/x.png"));
/// assert!(is_external_url("//cdn.example.com/x.png"));
/// assert!(is_external_url("data:image/png;base64,AAAA"));
/// assert!(!is_external_url("../images/logo.png"));
/// assert!(!is_external_url("/images/logo.png"));
/// ```
#[inline]
pub fn is_external_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("//")
        || lower.starts_with("data:")
}

/// Split a reference into its path and `?query`/`#fragment` suffix.
///
/// # Examples
/// ```
/// use assetpush::utils::path::split_path_suffix;
/// assert_eq!(split_path_suffix("font.eot?#iefix"), ("font.eot", "?#iefix"));
/// assert_eq!(split_path_suffix("a.svg#icon"), ("a.svg", "#icon"));
/// assert_eq!(split_path_suffix("a.png"), ("a.png", ""));
/// ```
#[inline]
pub fn split_path_suffix(url: &str) -> (&str, &str) {
    match url.find(['?', '#']) {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
    }
}

/// Normalize a storage key: forward slashes, no leading slash, no empty segments.
///
/// # Examples
/// ```
/// use assetpush::utils::path::normalize_key;
/// assert_eq!(normalize_key("/js\\abc.js"), "js/abc.js");
/// assert_eq!(normalize_key("images//logo.png"), "images/logo.png");
/// ```
pub fn normalize_key(key: &str) -> String {
    key.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
