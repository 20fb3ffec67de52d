//! Request path normalization for redirect lookups.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Maps a raw request path to its canonical redirect lookup key.
///
/// # Normalization Rules
///
/// 1. **Case**: Lower-cased (Unicode aware)
/// 2. **Trailing slashes**: All of them are removed
/// 3. **Root**: An empty result becomes `/`
///
/// The function is total and idempotent, so already-normalized keys can be
/// passed through it again safely.
///
/// # Examples
///
/// ```
/// use tour_redirects::utils::path_normalizer::normalize_path;
///
/// assert_eq!(normalize_path("/Tours/Iceland/"), "/tours/iceland");
/// assert_eq!(normalize_path("///"), "/");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> String {
    let lowered = path.to_lowercase();
    let trimmed = lowered.trim_end_matches('/');

    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Percent-decodes a request URI path into the text form rules are written in.
///
/// Clients send `/safari/übersicht` as `/safari/%C3%BCbersicht`. Paths that
/// do not decode to valid UTF-8 are returned unchanged.
///
/// ```
/// use tour_redirects::utils::path_normalizer::decode_request_path;
///
/// assert_eq!(decode_request_path("/safari/%C3%BCbersicht"), "/safari/übersicht");
/// assert_eq!(decode_request_path("/plain"), "/plain");
/// ```
pub fn decode_request_path(path: &str) -> Cow<'_, str> {
    percent_decode_str(path)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(path))
}
