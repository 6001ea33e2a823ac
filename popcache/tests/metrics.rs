//! Verifies lookup outcomes and origin fetches are recorded as metrics.

#![cfg(feature = "metrics")]

mod common;

use common::{MockUpstream, Reply, cache, get};
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use metrics_util::{CompositeKey, MetricKind};

type SnapshotEntry = (
    CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
);

fn counter(entries: &[SnapshotEntry], name: &str) -> Option<u64> {
    entries.iter().find_map(|(key, _, _, value)| match value {
        DebugValue::Counter(count)
            if key.kind() == MetricKind::Counter && key.key().name() == name =>
        {
            Some(*count)
        }
        _ => None,
    })
}

fn histogram_count(entries: &[SnapshotEntry], name: &str) -> usize {
    entries
        .iter()
        .find_map(|(key, _, _, value)| match value {
            DebugValue::Histogram(samples)
                if key.kind() == MetricKind::Histogram && key.key().name() == name =>
            {
                Some(samples.len())
            }
            _ => None,
        })
        .unwrap_or(0)
}

/// Runs `scenario` on a current-thread runtime so the local recorder sees
/// every metric.
fn record<F>(scenario: F) -> Vec<SnapshotEntry>
where
    F: AsyncFnOnce(),
{
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(scenario())
    });

    snapshotter.snapshot().into_vec()
}

#[test]
fn miss_hit_and_stale_are_counted() {
    let entries = record(async || {
        let upstream = MockUpstream::new(Reply::ok(vec![("cache-control", "max-age=5")], "x"));
        let (cache, time, _) = cache(upstream);

        cache.handle(get("/a")).await;
        cache.handle(get("/a")).await;
        time.advance_secs(10);
        cache.handle(get("/a")).await;
    });

    assert_eq!(counter(&entries, "popcache_cache_miss_total"), Some(1));
    assert_eq!(counter(&entries, "popcache_cache_hit_total"), Some(1));
    assert_eq!(counter(&entries, "popcache_cache_stale_total"), Some(1));
    assert_eq!(counter(&entries, "popcache_cache_bypass_total"), None);
    assert_eq!(
        histogram_count(&entries, "popcache_upstream_duration_seconds"),
        2
    );
    assert_eq!(counter(&entries, "popcache_upstream_error_total"), None);
}

#[test]
fn bypass_and_upstream_errors_are_counted() {
    let entries = record(async || {
        let upstream = MockUpstream::new(Reply::ok(
            vec![("cache-control", "max-age=soon")],
            "x",
        ));
        let (cache, _, _) = cache(upstream.clone());

        cache.handle(get("/b")).await;
        upstream.set_reply(Reply::Unreachable);
        cache.handle(get("/b")).await;
    });

    assert_eq!(counter(&entries, "popcache_cache_miss_total"), Some(1));
    assert_eq!(counter(&entries, "popcache_cache_bypass_total"), Some(1));
    assert_eq!(counter(&entries, "popcache_upstream_error_total"), Some(1));
    assert_eq!(
        histogram_count(&entries, "popcache_upstream_duration_seconds"),
        2
    );
}

#[test]
fn relayed_requests_are_not_lookups() {
    let entries = record(async || {
        let upstream = MockUpstream::new(Reply::ok(vec![], "x"));
        let (cache, _, _) = cache(upstream);
        cache
            .handle(http::Request::post("/c").body(()).unwrap())
            .await;
    });

    assert_eq!(counter(&entries, "popcache_cache_miss_total"), None);
    assert_eq!(counter(&entries, "popcache_cache_hit_total"), None);
}
