//! Outcome of a single request as seen by the cache.

use std::fmt;

/// How the cache took part in producing a response.
///
/// The orchestrator attaches this value to the response extensions. It is
/// never written into the response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheStatus {
    /// A fresh stored response was served without contacting the origin.
    Hit,
    /// No stored response existed; the origin was contacted.
    #[default]
    Miss,
    /// A stored response existed but its `max-age` had elapsed.
    Stale,
    /// A stored response existed but carried no usable `max-age`.
    Bypass,
    /// The request was not a `GET` and was handed to the reverse proxy.
    Passthrough,
}

impl CacheStatus {
    /// Returns the status as a string slice.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "hit",
            CacheStatus::Miss => "miss",
            CacheStatus::Stale => "stale",
            CacheStatus::Bypass => "bypass",
            CacheStatus::Passthrough => "passthrough",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
