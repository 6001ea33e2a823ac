use std::fmt;
use std::sync::Arc;

use http::{Request, Response};
use popcache_backend::Backend;
use popcache_core::{CacheStatus, SystemTimeProvider, TimeProvider};
use tracing::{Instrument, Span, info_span};

use crate::body::PopBody;
use crate::config::OriginUrl;
use crate::fsm::State;
use crate::offload::{DisabledOffload, Offload};
use crate::upstream::{DisabledPassthrough, Passthrough, Upstream};

/// Caching front for an origin server.
///
/// `PopCache` owns the store handle, the origin client, the relay for
/// non-`GET` requests and the clock. It holds no per-request state, so a
/// single instance (usually behind an `Arc`) serves every connection
/// concurrently; the store is the only shared mutable state.
///
/// There is no per-key coordination: concurrent misses for the same key
/// each fetch from the origin, and the last cacheable response written wins.
///
/// Store writes of cache fills are awaited before the response is returned
/// unless an [`Offload`] is set with [`PopCache::offload`].
///
/// # Example
///
/// ```rust,ignore
/// let cache = PopCache::new(
///     OriginUrl::parse("http://localhost:8888")?,
///     MemoryBackend::new(),
///     HyperUpstream::new(),
/// )
/// .passthrough(ReverseProxy::new(origin, "pop-1"))
/// .offload(TokioOffload);
///
/// let response = cache.handle(request).await;
/// ```
pub struct PopCache<B, U, P = DisabledPassthrough, O = DisabledOffload> {
    pub(crate) backend: Arc<B>,
    pub(crate) upstream: U,
    pub(crate) passthrough: P,
    pub(crate) offload: Option<O>,
    pub(crate) origin: OriginUrl,
    pub(crate) time: Arc<dyn TimeProvider>,
}

impl<B, U> PopCache<B, U, DisabledPassthrough>
where
    B: Backend,
    U: Upstream,
{
    /// Creates a cache in front of `origin`, storing into `backend` and
    /// fetching through `upstream`.
    ///
    /// Non-`GET` requests are answered with `405` until a relay is set with
    /// [`PopCache::passthrough`].
    pub fn new(origin: OriginUrl, backend: B, upstream: U) -> Self {
        PopCache {
            backend: Arc::new(backend),
            upstream,
            passthrough: DisabledPassthrough,
            offload: None,
            origin,
            time: Arc::new(SystemTimeProvider),
        }
    }
}

impl<B, U, P, O> PopCache<B, U, P, O> {
    /// Replaces the relay used for non-`GET` requests.
    pub fn passthrough<NP>(self, passthrough: NP) -> PopCache<B, U, NP, O> {
        PopCache {
            backend: self.backend,
            upstream: self.upstream,
            passthrough,
            offload: self.offload,
            origin: self.origin,
            time: self.time,
        }
    }

    /// Moves store writes off the request path onto `offload`.
    pub fn offload<NO: Offload>(self, offload: NO) -> PopCache<B, U, P, NO> {
        PopCache {
            backend: self.backend,
            upstream: self.upstream,
            passthrough: self.passthrough,
            offload: Some(offload),
            origin: self.origin,
            time: self.time,
        }
    }

    /// Replaces the clock used to stamp and judge stored responses.
    pub fn time_provider(self, time: impl TimeProvider + 'static) -> Self {
        PopCache {
            time: Arc::new(time),
            ..self
        }
    }

    /// Shared handle to the store.
    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    /// Configured origin.
    pub fn origin(&self) -> &OriginUrl {
        &self.origin
    }
}

impl<B, U, P, O> PopCache<B, U, P, O>
where
    B: Backend + 'static,
    U: Upstream,
    O: Offload,
{
    /// Runs `request` through the state machine and returns the response for
    /// the caller.
    ///
    /// Never fails: origin and store problems are turned into error
    /// responses or cache misses.
    pub async fn handle<ReqBody>(&self, request: Request<ReqBody>) -> Response<PopBody>
    where
        P: Passthrough<ReqBody>,
        ReqBody: Send + 'static,
    {
        let span = info_span!(
            "popcache.request",
            method = %request.method(),
            uri = %request.uri(),
            cache.status = tracing::field::Empty,
        );

        async move {
            let mut state = State::Route { request };
            loop {
                state = match state {
                    State::Done { response } => {
                        if let Some(status) = response.extensions().get::<CacheStatus>() {
                            Span::current().record("cache.status", status.as_str());
                        }
                        return response;
                    }
                    state => self.transition(state).await,
                };
            }
        }
        .instrument(span)
        .await
    }
}

impl<B, U, P, O> fmt::Debug for PopCache<B, U, P, O>
where
    B: Backend,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopCache")
            .field("backend", &self.backend.name())
            .field("origin", &self.origin)
            .field("offload", &self.offload.is_some())
            .field("time", &self.time)
            .finish()
    }
}
