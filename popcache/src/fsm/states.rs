use std::fmt::Debug;
use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Request, Response, request, response};
use popcache_core::{CacheStatus, RequestKey, StoredResponse};

use crate::body::PopBody;

/// State of a single request.
pub enum State<ReqBody> {
    /// Initial state: decide between the cache path and the relay.
    Route {
        /// Incoming request.
        request: Request<ReqBody>,
    },
    /// Non-`GET` request handed to the passthrough collaborator.
    ProxyNonGet {
        /// Incoming request, forwarded whole.
        request: Request<ReqBody>,
    },
    /// Looking the request key up in the store.
    CacheLookup {
        /// Head of the incoming request.
        parts: request::Parts,
        /// Store key of the request.
        key: RequestKey,
    },
    /// Fresh entry found; replay it.
    ServeCached {
        /// Snapshot to replay.
        stored: Arc<StoredResponse>,
    },
    /// Fetching from the origin.
    FetchOrigin {
        /// Head of the incoming request.
        parts: request::Parts,
        /// Store key of the request.
        key: RequestKey,
        /// Why the store could not answer.
        status: CacheStatus,
    },
    /// Origin response fully read; store it if allowed.
    StoreIfCacheable {
        /// Store key of the request.
        key: RequestKey,
        /// Method of the original request.
        method: Method,
        /// Head of the origin response.
        parts: response::Parts,
        /// Fully read origin body.
        body: Bytes,
        /// Why the store could not answer.
        status: CacheStatus,
    },
    /// Final state with the response for the caller.
    Done {
        /// Response for the caller.
        response: Response<PopBody>,
    },
}

impl<ReqBody> State<ReqBody> {
    /// Name of the state, as used in span names.
    pub fn name(&self) -> &'static str {
        match self {
            State::Route { .. } => "Route",
            State::ProxyNonGet { .. } => "ProxyNonGet",
            State::CacheLookup { .. } => "CacheLookup",
            State::ServeCached { .. } => "ServeCached",
            State::FetchOrigin { .. } => "FetchOrigin",
            State::StoreIfCacheable { .. } => "StoreIfCacheable",
            State::Done { .. } => "Done",
        }
    }
}

impl<ReqBody> Debug for State<ReqBody> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "State::{}", self.name())
    }
}
