use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::routing::any;
use http::{Request, Response};
use popcache::{MemoryBackend, PopBody, PopCache};

use crate::offload::TokioOffload;
use crate::proxy::ReverseProxy;
use crate::rps::{RpsLayer, RpsMeter};
use crate::status::{StatusState, latencyz, statusz};
use crate::upstream::HyperUpstream;

/// Cache wired to the network collaborators of a node.
pub type NodeCache = PopCache<MemoryBackend, HyperUpstream, ReverseProxy, TokioOffload>;

#[derive(Clone)]
struct AppState {
    cache: Arc<NodeCache>,
    status: StatusState,
}

impl axum::extract::FromRef<AppState> for StatusState {
    fn from_ref(state: &AppState) -> Self {
        state.status.clone()
    }
}

/// Builds the node router.
///
/// `/statusz` and `/latencyz` answer any method; every other path goes
/// through the cache. Every request, status endpoints included, is counted by
/// `meter`.
pub fn router(cache: Arc<NodeCache>, node_id: &str, meter: Arc<RpsMeter>) -> Router {
    let state = AppState {
        cache,
        status: StatusState::new(node_id, Arc::clone(&meter)),
    };

    Router::new()
        .route("/statusz", any(statusz))
        .route("/latencyz", any(latencyz))
        .fallback(handle)
        .with_state(state)
        .layer(RpsLayer::new(meter))
}

async fn handle(State(state): State<AppState>, request: Request<Body>) -> Response<PopBody> {
    state.cache.handle(request).await
}
