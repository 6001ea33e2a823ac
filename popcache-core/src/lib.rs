#![warn(missing_docs)]
//! # popcache-core
//!
//! Core types and pure policies for the PoP edge cache.
//!
//! This crate holds everything the caching decision needs that does not
//! touch the network or the store:
//!
//! - **Parse** `Cache-Control` style headers into directives ([`ParsedDirectives`])
//! - **Decide** whether an origin response may be stored ([`is_cacheable`])
//! - **Judge** whether a stored response is still fresh ([`is_fresh`], [`Freshness`])
//! - **Snapshot** an origin response for storage ([`StoredResponse`])
//! - **Identify** a request in the store ([`RequestKey`])
//!
//! The orchestration state machine lives in the `popcache` crate and the
//! store in `popcache-backend`.

pub mod context;
pub mod directive;
pub mod freshness;
pub mod key;
pub mod policy;
pub mod response;
pub mod time;

pub use context::CacheStatus;
pub use directive::ParsedDirectives;
pub use freshness::{Freshness, MaxAge, is_fresh};
pub use key::RequestKey;
pub use policy::is_cacheable;
pub use response::StoredResponse;
pub use time::{SystemTimeProvider, TimeProvider};

#[doc(hidden)]
pub use smol_str::SmolStr;

/// Raw byte data type used for stored response bodies.
/// Using `Bytes` provides cheap cloning via reference counting.
pub type Raw = bytes::Bytes;
