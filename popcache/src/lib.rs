#![warn(missing_docs)]
//! # popcache
//!
//! Request orchestration for a CDN point-of-presence cache.
//!
//! For every incoming request [`PopCache`] runs a small state machine:
//!
//! ```text
//! Route ─┬─ non-GET ──▶ ProxyNonGet ─────────────────────────────▶ Done
//!        └─ GET ──────▶ CacheLookup ─┬─ fresh ──▶ ServeCached ────▶ Done
//!                                    └─ miss / stale / bypass
//!                                          ──▶ FetchOrigin ──▶ StoreIfCacheable ──▶ Done
//! ```
//!
//! The pieces it coordinates live in sibling crates:
//!
//! - directive parsing and freshness rules in [`popcache_core`]
//! - the shared response store in [`popcache_backend`]
//!
//! The network sits behind two collaborator traits: [`Upstream`] performs
//! the origin fetch for `GET` requests and [`Passthrough`] relays every other
//! method untouched.
//!
//! ## Feature Flags
//!
//! - `metrics` - Record hit/miss/stale/bypass counters and upstream timings
//!   through the [`metrics`](https://docs.rs/metrics) facade.

/// Response body type and helpers.
pub mod body;

mod cache;

/// Origin configuration.
pub mod config;

/// Error types for request orchestration.
pub mod error;

/// Finite State Machine driving each request.
///
/// Every state runs inside a `fsm.<State>` tracing span nested under the
/// `popcache.request` span of the request.
pub mod fsm;

/// Header hygiene for messages crossing the node.
pub mod headers;

/// Metrics collection for cache observability.
pub mod metrics;

/// Background execution of store writes.
pub mod offload;

/// Collaborator traits for origin fetches and non-`GET` relaying.
pub mod upstream;

pub use body::{BoxError, PopBody};
pub use cache::PopCache;
pub use config::{ConfigError, OriginUrl};
pub use error::CacheError;
pub use offload::{DisabledOffload, Offload};
pub use upstream::{DisabledPassthrough, Passthrough, Upstream};

pub use popcache_backend::{Backend, BackendError, MemoryBackend};
pub use popcache_core::{
    CacheStatus, Freshness, MaxAge, ParsedDirectives, RequestKey, StoredResponse,
    SystemTimeProvider, TimeProvider,
};
