//! Tests for cacheability and freshness.

use bytes::Bytes;
use chrono::{DateTime, Duration, TimeZone, Utc};
use http::header::CACHE_CONTROL;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use popcache_core::{Freshness, MaxAge, StoredResponse, is_cacheable, is_fresh};
use pretty_assertions::assert_eq;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

fn cache_control(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(value));
    headers
}

fn stored(value: &'static str) -> StoredResponse {
    StoredResponse::new(StatusCode::OK, cache_control(value), Bytes::new(), t0())
}

#[test]
fn test_freshness_boundary() {
    assert!(is_fresh(t0(), 60, t0()));
    assert!(is_fresh(t0(), 60, t0() + Duration::seconds(60)));
    assert!(!is_fresh(t0(), 60, t0() + Duration::seconds(61)));
}

#[test]
fn test_freshness_uses_whole_seconds() {
    assert!(is_fresh(t0(), 60, t0() + Duration::milliseconds(60_999)));
    assert!(!is_fresh(t0(), 60, t0() + Duration::milliseconds(61_000)));
}

#[test]
fn test_zero_and_negative_max_age() {
    assert!(is_fresh(t0(), 0, t0()));
    assert!(!is_fresh(t0(), 0, t0() + Duration::seconds(1)));
    assert!(!is_fresh(t0(), -1, t0()));
}

#[test]
fn test_get_with_max_age_is_cacheable() {
    assert!(is_cacheable(&Method::GET, &cache_control("max-age=10")));
    assert!(is_cacheable(&Method::GET, &HeaderMap::new()));
}

#[test]
fn test_no_store_is_not_cacheable() {
    assert!(!is_cacheable(&Method::GET, &cache_control("no-store, max-age=10")));
    assert!(!is_cacheable(&Method::GET, &cache_control("max-age=10,no-store")));
}

#[test]
fn test_no_store_is_a_substring_match() {
    assert!(!is_cacheable(&Method::GET, &cache_control("x-no-store-ish=1")));
}

#[test]
fn test_no_store_in_any_value() {
    let mut headers = cache_control("max-age=10");
    headers.append(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    assert!(!is_cacheable(&Method::GET, &headers));
}

#[test]
fn test_non_get_is_never_cacheable() {
    for method in [Method::POST, Method::PUT, Method::HEAD, Method::DELETE] {
        assert!(!is_cacheable(&method, &cache_control("max-age=10")));
        assert!(!is_cacheable(&method, &HeaderMap::new()));
    }
}

#[test]
fn test_evaluate_fresh_and_stale() {
    let entry = stored("public, max-age=5");

    assert_eq!(Freshness::evaluate(&entry, t0() + Duration::seconds(2)), Freshness::Fresh);
    assert_eq!(Freshness::evaluate(&entry, t0() + Duration::seconds(10)), Freshness::Stale);
}

#[test]
fn test_evaluate_bypass() {
    assert_eq!(
        Freshness::evaluate(&stored("max-age=notanumber"), t0()),
        Freshness::Bypass(MaxAge::Invalid("notanumber".to_owned()))
    );
    assert_eq!(
        Freshness::evaluate(&stored("public"), t0()),
        Freshness::Bypass(MaxAge::Absent)
    );

    let no_headers = StoredResponse::new(StatusCode::OK, HeaderMap::new(), Bytes::new(), t0());
    assert_eq!(Freshness::evaluate(&no_headers, t0()), Freshness::Bypass(MaxAge::Absent));
}

#[test]
fn test_to_response_replays_snapshot() {
    let mut headers = cache_control("max-age=5");
    headers.append("x-multi", HeaderValue::from_static("one"));
    headers.append("x-multi", HeaderValue::from_static("two"));
    let entry = StoredResponse::new(StatusCode::NOT_FOUND, headers, Bytes::from_static(b"gone"), t0());

    let response = entry.to_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let multi: Vec<_> = response.headers().get_all("x-multi").iter().collect();
    assert_eq!(multi, vec!["one", "two"]);
    assert_eq!(response.body().as_ref(), b"gone");
    assert_eq!(entry.body().as_ref(), b"gone");
}
