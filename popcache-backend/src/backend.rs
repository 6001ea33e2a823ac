use std::sync::Arc;

use async_trait::async_trait;
use popcache_core::{RequestKey, StoredResponse};

use crate::BackendError;

pub type BackendResult<T> = Result<T, BackendError>;

/// Shared response store.
///
/// Reads sit on the request path of every `GET`. Writes of cache fills are
/// awaited before the response is returned unless the cache hands them to
/// an offload, so a slow `write` delays every miss of an inline cache.
///
/// Errors never fail a request: a failed read counts as a miss and a failed
/// write is logged and dropped.
#[async_trait]
pub trait Backend: Sync + Send {
    /// Returns the snapshot stored under `key`, if any.
    async fn read(&self, key: &RequestKey) -> BackendResult<Option<Arc<StoredResponse>>>;

    /// Stores `value` under `key`, replacing any previous snapshot as a whole.
    async fn write(&self, key: &RequestKey, value: StoredResponse) -> BackendResult<()>;

    /// Returns the name of this backend, used in logs.
    fn name(&self) -> &str {
        "backend"
    }
}

#[async_trait]
impl<B> Backend for Arc<B>
where
    B: Backend + ?Sized,
{
    async fn read(&self, key: &RequestKey) -> BackendResult<Option<Arc<StoredResponse>>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &RequestKey, value: StoredResponse) -> BackendResult<()> {
        (**self).write(key, value).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl Backend for Box<dyn Backend> {
    async fn read(&self, key: &RequestKey) -> BackendResult<Option<Arc<StoredResponse>>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &RequestKey, value: StoredResponse) -> BackendResult<()> {
        (**self).write(key, value).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
