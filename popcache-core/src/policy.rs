//! Storage eligibility of origin responses.

use http::{HeaderMap, Method, header::CACHE_CONTROL};

/// Returns `true` if a response to a `method` request carrying `headers`
/// may be stored.
///
/// Only `GET` responses are eligible. An eligible response is rejected when
/// any `Cache-Control` value contains the substring `no-store`. The match is
/// a raw substring test, not a directive lookup, so a directive merely
/// containing those characters also disables storage.
///
/// ```
/// use http::{HeaderMap, HeaderValue, Method, header::CACHE_CONTROL};
/// use popcache_core::is_cacheable;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=10"));
/// assert!(is_cacheable(&Method::GET, &headers));
/// assert!(!is_cacheable(&Method::POST, &headers));
///
/// headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=10"));
/// assert!(!is_cacheable(&Method::GET, &headers));
/// ```
pub fn is_cacheable(method: &Method, headers: &HeaderMap) -> bool {
    if method != Method::GET {
        return false;
    }

    !headers
        .get_all(CACHE_CONTROL)
        .iter()
        .any(|value| String::from_utf8_lossy(value.as_bytes()).contains("no-store"))
}
