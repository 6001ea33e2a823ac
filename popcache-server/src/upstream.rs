use bytes::Bytes;
use futures::future::BoxFuture;
use http::{Request, Response};
use http_body_util::Empty;
use hyper::body::Incoming;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::{Client, Error};
use hyper_util::rt::TokioExecutor;
use popcache::Upstream;

/// Origin client for cache fills, over plain HTTP/1.
///
/// Connections are pooled and shared by every request of the node.
#[derive(Debug, Clone)]
pub struct HyperUpstream {
    client: Client<HttpConnector, Empty<Bytes>>,
}

impl HyperUpstream {
    /// Creates a client with a fresh connection pool.
    pub fn new() -> Self {
        HyperUpstream {
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }
}

impl Default for HyperUpstream {
    fn default() -> Self {
        Self::new()
    }
}

impl Upstream for HyperUpstream {
    type Body = Incoming;
    type Error = Error;

    fn call(
        &self,
        request: Request<Empty<Bytes>>,
    ) -> BoxFuture<'_, Result<Response<Self::Body>, Self::Error>> {
        Box::pin(self.client.request(request))
    }
}
