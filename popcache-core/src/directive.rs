//! Structured view over directive-carrying headers.
//!
//! Headers such as `Cache-Control` carry a comma separated list of
//! directives, each either a bare flag (`no-store`) or a `name=value` pair
//! (`max-age=60`, `private="set-cookie"`). [`ParsedDirectives`] turns a whole
//! [`HeaderMap`] into a lookup table keyed by lower-cased header name and
//! lower-cased directive name.
//!
//! ```
//! use http::{HeaderMap, HeaderValue, header::CACHE_CONTROL};
//! use popcache_core::ParsedDirectives;
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(CACHE_CONTROL, HeaderValue::from_static("public, Max-Age=60"));
//!
//! let parsed = ParsedDirectives::parse(&headers);
//! assert_eq!(parsed.lookup("cache-control", "max-age"), Some("60"));
//! assert_eq!(parsed.lookup("Cache-Control", "PUBLIC"), Some(""));
//! assert_eq!(parsed.lookup("cache-control", "no-store"), None);
//! ```

use std::collections::HashMap;

use http::HeaderMap;
use smol_str::SmolStr;

/// Directives of a single header: directive name to value.
///
/// Bare flags map to an empty string.
pub type Directives = HashMap<SmolStr, String>;

/// Directive table derived from a header collection.
///
/// Read-only once built. Header names and directive names are stored
/// lower-cased, so every lookup is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDirectives {
    by_header: HashMap<SmolStr, Directives>,
}

impl ParsedDirectives {
    /// Parses every header of `headers` into its directives.
    ///
    /// Multiple values of the same header are joined with `", "` before
    /// splitting, the same way repeated headers combine on the wire. Values
    /// that are not valid UTF-8 are decoded lossily.
    pub fn parse(headers: &HeaderMap) -> Self {
        let mut by_header = HashMap::new();

        for name in headers.keys() {
            let values: Vec<_> = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
                .collect();
            if values.is_empty() {
                continue;
            }
            let joined = values.join(", ");
            by_header.insert(
                SmolStr::new(name.as_str().to_ascii_lowercase()),
                parse_directives(&joined),
            );
        }

        ParsedDirectives { by_header }
    }

    /// Looks up `directive` within `header`.
    ///
    /// Returns `None` when the header was never observed or does not carry
    /// the directive. A bare flag returns `Some("")`.
    pub fn lookup(&self, header: &str, directive: &str) -> Option<&str> {
        self.by_header
            .get(header.to_ascii_lowercase().as_str())
            .and_then(|directives| directives.get(directive.to_ascii_lowercase().as_str()))
            .map(String::as_str)
    }
}

/// Splits one joined header value into its directives.
///
/// Later occurrences of the same directive overwrite earlier ones.
pub fn parse_directives(value: &str) -> Directives {
    let mut directives = Directives::new();

    for token in value.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        match token.split_once('=') {
            Some((name, value)) => {
                let name = name.trim().to_ascii_lowercase();
                directives.insert(SmolStr::new(name), unquote(value.trim()).to_owned());
            }
            None => {
                directives.insert(SmolStr::new(token.to_ascii_lowercase()), String::new());
            }
        }
    }

    directives
}

/// Strips one leading and one trailing `"`, if present.
fn unquote(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}
