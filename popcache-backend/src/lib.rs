//! Response store for the PoP edge cache.
//!
//! The store maps a [`RequestKey`] to an immutable [`StoredResponse`]
//! snapshot. It is the only shared mutable state of the cache, so every
//! implementation must be safe for many concurrent readers and writers:
//!
//! - a read observes either the previous or the new snapshot in full, never a
//!   mix of the two;
//! - readers do not wait on each other, and a write never blocks readers
//!   indefinitely.
//!
//! Snapshots are handed out as `Arc<StoredResponse>`, so a reader keeps a
//! consistent view even if the entry is replaced while it is being served.
//!
//! There is no eviction and no capacity bound: an entry lives until it is
//! overwritten or the store is dropped.
//!
//! [`RequestKey`]: popcache_core::RequestKey
//! [`StoredResponse`]: popcache_core::StoredResponse

mod backend;
mod memory;

pub use backend::{Backend, BackendResult};
pub use memory::MemoryBackend;
use thiserror::Error;

/// Error describing a failed store interaction.
///
/// The in-memory store never fails. Stores that talk to something outside
/// the process report transport trouble as `ConnectionError` and anything
/// else as `InternalError`.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Internal backend error, state or computation error.
    #[error(transparent)]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
    /// Network interaction error.
    #[error(transparent)]
    ConnectionError(Box<dyn std::error::Error + Send + Sync>),
}
