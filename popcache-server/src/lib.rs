//! # popcache-server
//!
//! HTTP front end of a PoP cache node.
//!
//! Wires [`popcache::PopCache`] to the network: a pooled hyper client for
//! cache fills ([`HyperUpstream`]), a streaming relay for every other method
//! ([`ReverseProxy`]), background store writes ([`TokioOffload`]) and the
//! `/statusz` and `/latencyz` endpoints used by the PoP selector, all behind
//! an axum router.

mod app;
pub mod config;
pub mod offload;
pub mod proxy;
pub mod rps;
pub mod status;
pub mod upstream;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use popcache::{MemoryBackend, OriginUrl, PopCache};
use tokio::net::TcpListener;

pub use app::{NodeCache, router};
pub use config::Args;
pub use offload::TokioOffload;
pub use proxy::{NODE_ID_HEADER, ReverseProxy};
pub use rps::{RpsLayer, RpsMeter};
pub use status::{PopStatus, StatusState};
pub use upstream::HyperUpstream;

/// Assembles the node router for `origin`.
pub fn build(origin: OriginUrl, node_id: &str) -> anyhow::Result<Router> {
    let proxy = ReverseProxy::new(origin.clone(), node_id)?;
    let cache = PopCache::new(origin, MemoryBackend::new(), HyperUpstream::new())
        .passthrough(proxy)
        .offload(TokioOffload);
    Ok(router(
        Arc::new(cache),
        node_id,
        Arc::new(RpsMeter::default()),
    ))
}

/// Serves `app` on `listener` until `shutdown` resolves.
///
/// Client addresses are made available to the relay for
/// `X-Forwarded-For`.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}
