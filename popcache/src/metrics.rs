//! Metrics declaration and recording.
//!
//! All functions are no-ops unless the `metrics` feature is enabled.

use std::time::Duration;

use popcache_core::CacheStatus;

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of requests served from the store.
    pub static ref CACHE_HIT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "popcache_cache_hit_total",
            "Total number of requests served from the store."
        );
        "popcache_cache_hit_total"
    };
    /// Track number of lookups that found nothing stored.
    pub static ref CACHE_MISS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "popcache_cache_miss_total",
            "Total number of lookups that found nothing stored."
        );
        "popcache_cache_miss_total"
    };
    /// Track number of lookups that found an expired entry.
    pub static ref CACHE_STALE_COUNTER: &'static str = {
        metrics::describe_counter!(
            "popcache_cache_stale_total",
            "Total number of lookups that found an entry past its max-age."
        );
        "popcache_cache_stale_total"
    };
    /// Track number of lookups that found an entry without a usable max-age.
    pub static ref CACHE_BYPASS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "popcache_cache_bypass_total",
            "Total number of lookups that found an entry without a usable max-age."
        );
        "popcache_cache_bypass_total"
    };
    /// Track number of failed origin fetches.
    pub static ref UPSTREAM_ERROR_COUNTER: &'static str = {
        metrics::describe_counter!(
            "popcache_upstream_error_total",
            "Total number of origin fetches that failed."
        );
        "popcache_upstream_error_total"
    };
    /// Metric of origin fetch timings.
    pub static ref UPSTREAM_DURATION_HISTOGRAM: &'static str = {
        metrics::describe_histogram!(
            "popcache_upstream_duration_seconds",
            metrics::Unit::Seconds,
            "Duration of origin fetches in seconds."
        );
        "popcache_upstream_duration_seconds"
    };
}

/// Records the outcome of a cache lookup.
#[cfg(feature = "metrics")]
pub fn record_lookup(status: CacheStatus) {
    let name = match status {
        CacheStatus::Hit => *CACHE_HIT_COUNTER,
        CacheStatus::Miss => *CACHE_MISS_COUNTER,
        CacheStatus::Stale => *CACHE_STALE_COUNTER,
        CacheStatus::Bypass => *CACHE_BYPASS_COUNTER,
        CacheStatus::Passthrough => return,
    };
    metrics::counter!(name).increment(1);
}

/// Records the outcome of a cache lookup.
#[cfg(not(feature = "metrics"))]
#[inline(always)]
pub fn record_lookup(_status: CacheStatus) {}

/// Records an origin fetch and whether it produced a response.
#[cfg(feature = "metrics")]
pub fn record_upstream(duration: Duration, ok: bool) {
    metrics::histogram!(*UPSTREAM_DURATION_HISTOGRAM).record(duration.as_secs_f64());
    if !ok {
        metrics::counter!(*UPSTREAM_ERROR_COUNTER).increment(1);
    }
}

/// Records an origin fetch and whether it produced a response.
#[cfg(not(feature = "metrics"))]
#[inline(always)]
pub fn record_upstream(_duration: Duration, _ok: bool) {}
