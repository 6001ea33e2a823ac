//! Freshness of stored responses.
//!
//! A stored response is usable without contacting the origin only while the
//! whole seconds elapsed since it was stored do not exceed the `max-age`
//! directive of its `Cache-Control` header. Missing or malformed `max-age`
//! never raises an error: the entry is simply not served.

use chrono::{DateTime, Utc};
use http::header::CACHE_CONTROL;

use crate::directive::ParsedDirectives;
use crate::response::StoredResponse;

/// Name of the directive governing freshness.
pub const MAX_AGE: &str = "max-age";

/// Returns `true` if `now - stored_at`, in whole seconds, is at most
/// `max_age` seconds.
///
/// A negative `max_age` is never fresh.
///
/// ```
/// use chrono::{Duration, Utc};
/// use popcache_core::is_fresh;
///
/// let t0 = Utc::now();
/// assert!(is_fresh(t0, 60, t0 + Duration::seconds(60)));
/// assert!(!is_fresh(t0, 60, t0 + Duration::seconds(61)));
/// ```
pub fn is_fresh(stored_at: DateTime<Utc>, max_age: i64, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(stored_at).num_seconds() <= max_age
}

/// The `max-age` directive as found on a stored response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaxAge {
    /// No `max-age` directive under `Cache-Control`.
    Absent,
    /// `max-age` present but not an integer; holds the raw value.
    Invalid(String),
    /// Parsed `max-age` in seconds.
    Seconds(i64),
}

impl MaxAge {
    /// Extracts `max-age` from the `Cache-Control` directives.
    pub fn from_directives(directives: &ParsedDirectives) -> Self {
        match directives.lookup(CACHE_CONTROL.as_str(), MAX_AGE) {
            None => MaxAge::Absent,
            Some(raw) => raw
                .parse::<i64>()
                .map(MaxAge::Seconds)
                .unwrap_or_else(|_| MaxAge::Invalid(raw.to_owned())),
        }
    }
}

/// Verdict on a stored response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// Serve from the store.
    Fresh,
    /// `max-age` elapsed; refetch.
    Stale,
    /// No usable `max-age`; refetch without treating it as an error.
    Bypass(MaxAge),
}

impl Freshness {
    /// Evaluates `stored` against the clock reading `now`.
    pub fn evaluate(stored: &StoredResponse, now: DateTime<Utc>) -> Self {
        match MaxAge::from_directives(&stored.directives()) {
            MaxAge::Seconds(max_age) if is_fresh(stored.stored_at(), max_age, now) => {
                Freshness::Fresh
            }
            MaxAge::Seconds(_) => Freshness::Stale,
            other => Freshness::Bypass(other),
        }
    }

    /// Returns `true` for [`Freshness::Fresh`].
    #[inline]
    pub fn is_fresh(&self) -> bool {
        matches!(self, Freshness::Fresh)
    }
}
