use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::header::HOST;
use http::{Method, Request, Response, request, response};
use http_body_util::{BodyExt, Empty};
use popcache_backend::Backend;
use popcache_core::{CacheStatus, Freshness, MaxAge, RequestKey, StoredResponse, is_cacheable};
use tracing::{Instrument, debug, error, info_span, trace, warn};

use super::State;
use crate::body::{PopBody, full};
use crate::cache::PopCache;
use crate::error::CacheError;
use crate::headers::{remove_body_framing, remove_hop_by_hop};
use crate::metrics;
use crate::offload::Offload;
use crate::upstream::{Passthrough, Upstream};

impl<B, U, P, O> PopCache<B, U, P, O>
where
    B: Backend + 'static,
    U: Upstream,
    O: Offload,
{
    /// Advances `state` by one step.
    ///
    /// `State::Done` is returned unchanged.
    pub(crate) async fn transition<ReqBody>(&self, state: State<ReqBody>) -> State<ReqBody>
    where
        P: Passthrough<ReqBody>,
        ReqBody: Send + 'static,
    {
        match state {
            State::Route { request } => info_span!("fsm.Route").in_scope(|| {
                if request.method() == Method::GET {
                    let key = RequestKey::from_uri(request.uri());
                    trace!(%key, "cache path");
                    let (parts, _body) = request.into_parts();
                    State::CacheLookup { parts, key }
                } else {
                    trace!(method = %request.method(), "relaying to origin");
                    State::ProxyNonGet { request }
                }
            }),
            State::ProxyNonGet { request } => {
                let response = self
                    .passthrough
                    .forward(request)
                    .instrument(info_span!("fsm.ProxyNonGet"))
                    .await;
                done(response, CacheStatus::Passthrough)
            }
            State::CacheLookup { parts, key } => {
                let span = info_span!("fsm.CacheLookup", cache.key = %key);
                self.cache_lookup(parts, key).instrument(span).await
            }
            State::ServeCached { stored } => info_span!("fsm.ServeCached").in_scope(|| {
                trace!(status = %stored.status(), "replaying stored response");
                done(stored.to_response().map(full), CacheStatus::Hit)
            }),
            State::FetchOrigin { parts, key, status } => {
                let span = info_span!("fsm.FetchOrigin", cache.key = %key);
                self.fetch_origin(parts, key, status).instrument(span).await
            }
            State::StoreIfCacheable {
                key,
                method,
                parts,
                body,
                status,
            } => {
                let span = info_span!("fsm.StoreIfCacheable", cache.key = %key);
                let snapshot =
                    span.in_scope(|| self.snapshot_if_cacheable(&key, &method, &parts, &body));
                if let Some(stored) = snapshot {
                    let write =
                        write_snapshot(Arc::clone(&self.backend), key, stored).instrument(span);
                    match &self.offload {
                        Some(offload) => offload.spawn("cache_write", write),
                        None => write.await,
                    }
                }
                done(Response::from_parts(parts, full(body)), status)
            }
            state @ State::Done { .. } => state,
        }
    }

    async fn cache_lookup<ReqBody>(
        &self,
        parts: request::Parts,
        key: RequestKey,
    ) -> State<ReqBody> {
        let stored = match self.backend.read(&key).await {
            Ok(stored) => stored,
            Err(err) => {
                warn!(%key, error = %err, "store read failed, treating as miss");
                None
            }
        };

        let Some(stored) = stored else {
            debug!(%key, "miss");
            return self.lookup_outcome(parts, key, CacheStatus::Miss);
        };

        match Freshness::evaluate(&stored, self.time.now()) {
            Freshness::Fresh => {
                debug!(%key, "hit");
                metrics::record_lookup(CacheStatus::Hit);
                State::ServeCached { stored }
            }
            Freshness::Stale => {
                debug!(%key, "stale");
                self.lookup_outcome(parts, key, CacheStatus::Stale)
            }
            Freshness::Bypass(MaxAge::Invalid(value)) => {
                warn!(%key, max_age = %value, "Invalid max-age value");
                self.lookup_outcome(parts, key, CacheStatus::Bypass)
            }
            Freshness::Bypass(_) => {
                debug!(%key, "stored response has no max-age");
                self.lookup_outcome(parts, key, CacheStatus::Bypass)
            }
        }
    }

    fn lookup_outcome<ReqBody>(
        &self,
        parts: request::Parts,
        key: RequestKey,
        status: CacheStatus,
    ) -> State<ReqBody> {
        metrics::record_lookup(status);
        State::FetchOrigin { parts, key, status }
    }

    async fn fetch_origin<ReqBody>(
        &self,
        parts: request::Parts,
        key: RequestKey,
        status: CacheStatus,
    ) -> State<ReqBody> {
        let request = match self.origin_request(&parts) {
            Ok(request) => request,
            Err(err) => {
                error!(%key, error = %err, "failed to build origin request");
                return done(CacheError::from(err).into_response(), status);
            }
        };

        let uri = request.uri().clone();
        let started = Instant::now();
        let response = match self.upstream.call(request).await {
            Ok(response) => response,
            Err(err) => {
                metrics::record_upstream(started.elapsed(), false);
                let err = CacheError::Upstream(err.into());
                error!(%key, %uri, error = %err, "origin fetch failed");
                return done(err.into_response(), status);
            }
        };

        let (mut response_parts, body) = response.into_parts();
        remove_hop_by_hop(&mut response_parts.headers);
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => {
                metrics::record_upstream(started.elapsed(), false);
                let err = CacheError::Body(err.into());
                warn!(%key, %uri, error = %err, "failed to read origin response body");
                return done(err.into_response(), status);
            }
        };
        metrics::record_upstream(started.elapsed(), true);
        debug!(%key, status = %response_parts.status, bytes = body.len(), "origin responded");

        State::StoreIfCacheable {
            key,
            method: parts.method,
            parts: response_parts,
            body,
            status,
        }
    }

    /// Builds the origin request: same method and end-to-end headers, path
    /// and query on the origin, `Host` set to the origin authority, no body.
    fn origin_request(&self, parts: &request::Parts) -> Result<Request<Empty<Bytes>>, http::Error> {
        let uri = self.origin.rewrite(&parts.uri)?;
        let mut request = Request::builder()
            .method(parts.method.clone())
            .uri(uri)
            .body(Empty::new())?;
        let headers = request.headers_mut();
        *headers = parts.headers.clone();
        remove_hop_by_hop(headers);
        remove_body_framing(headers);
        headers.insert(HOST, self.origin.host_header().clone());
        Ok(request)
    }

    fn snapshot_if_cacheable(
        &self,
        key: &RequestKey,
        method: &Method,
        parts: &response::Parts,
        body: &Bytes,
    ) -> Option<StoredResponse> {
        if !is_cacheable(method, &parts.headers) {
            debug!(%key, "origin response not cacheable");
            return None;
        }

        Some(StoredResponse::new(
            parts.status,
            parts.headers.clone(),
            body.clone(),
            self.time.now(),
        ))
    }
}

async fn write_snapshot<B: Backend>(backend: Arc<B>, key: RequestKey, stored: StoredResponse) {
    match backend.write(&key, stored).await {
        Ok(()) => debug!(%key, backend = backend.name(), "stored"),
        Err(err) => warn!(%key, error = %err, "store write failed"),
    }
}

fn done<ReqBody>(mut response: Response<PopBody>, status: CacheStatus) -> State<ReqBody> {
    response.extensions_mut().insert(status);
    State::Done { response }
}
