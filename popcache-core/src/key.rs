//! Store key derived from the request target.
//!
//! A request is identified by its full request target: path plus query,
//! exactly as received. `/a?x=1` and `/a?x=2` are different entries, and so
//! are `/a?x=1&y=2` and `/a?y=2&x=1`.
//!
//! ```
//! use http::Uri;
//! use popcache_core::RequestKey;
//!
//! let uri: Uri = "/a?x=1".parse().unwrap();
//! assert_eq!(RequestKey::from_uri(&uri).as_str(), "/a?x=1");
//! ```

use std::fmt;

use http::Uri;
use smol_str::SmolStr;

/// Canonical identity of a request in the response store.
///
/// Backed by [`SmolStr`], so short targets are stored inline and cloning
/// never copies heap data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey(SmolStr);

impl RequestKey {
    /// Creates a key from a raw request target string.
    pub fn new(target: impl AsRef<str>) -> Self {
        RequestKey(SmolStr::new(target))
    }

    /// Creates a key from the request URI.
    ///
    /// Origin-form URIs (the usual server case) yield path and query. An
    /// absolute-form URI keeps its full string form.
    pub fn from_uri(uri: &Uri) -> Self {
        RequestKey(SmolStr::new(uri.to_string()))
    }

    /// Returns the key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&Uri> for RequestKey {
    fn from(uri: &Uri) -> Self {
        RequestKey::from_uri(uri)
    }
}

impl AsRef<str> for RequestKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
