//! In-memory backend implementation.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use popcache_core::{RequestKey, StoredResponse};
use tracing::trace;

use crate::{Backend, BackendResult};

/// In-memory response store backed by a sharded concurrent map.
///
/// Each shard is guarded by a reader/writer lock held only for the duration
/// of a single lookup or insert. Values are `Arc`-wrapped snapshots, so
/// replacing an entry is a pointer swap and readers clone the pointer out
/// before the lock is released.
///
/// Cloning a `MemoryBackend` shares the underlying map.
///
/// # Examples
///
/// ```
/// use popcache_backend::MemoryBackend;
///
/// let backend = MemoryBackend::new();
/// assert!(backend.is_empty());
/// ```
///
/// # Caveats
///
/// - Data is **not persisted**; the store is lost on process restart.
/// - There is **no eviction** and no capacity bound.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<DashMap<RequestKey, Arc<StoredResponse>>>,
}

impl MemoryBackend {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if an entry exists for `key`.
    pub fn contains(&self, key: &RequestKey) -> bool {
        self.entries.contains_key(key)
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn read(&self, key: &RequestKey) -> BackendResult<Option<Arc<StoredResponse>>> {
        let value = self.entries.get(key).map(|entry| Arc::clone(entry.value()));
        trace!(key = %key, found = value.is_some(), "memory backend read");
        Ok(value)
    }

    async fn write(&self, key: &RequestKey, value: StoredResponse) -> BackendResult<()> {
        self.entries.insert(key.clone(), Arc::new(value));
        trace!(key = %key, "memory backend write");
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
