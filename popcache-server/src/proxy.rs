//! Relay for requests that never touch the cache.

use std::net::{IpAddr, SocketAddr};

use axum::body::Body;
use axum::extract::ConnectInfo;
use futures::future::BoxFuture;
use http::header::{FORWARDED, HOST, HeaderName, HeaderValue, InvalidHeaderValue};
use http::{Request, Response, StatusCode, Version};
use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use popcache::body::empty;
use popcache::headers::remove_hop_by_hop;
use popcache::{BoxError, OriginUrl, Passthrough, PopBody};
use tracing::{debug, error};

/// Header carrying the id of the node that relayed the request.
pub const NODE_ID_HEADER: HeaderName = HeaderName::from_static("x-ncdn-popcache-nodeid");

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Forwards non-`GET` requests to the origin and streams the answer back.
///
/// The outbound request keeps method, headers and body. It is pointed at the
/// origin, tagged with the node id and the usual `X-Forwarded-*` headers.
/// When the node is served with connection info the client address is
/// appended to `X-Forwarded-For`.
#[derive(Debug, Clone)]
pub struct ReverseProxy {
    client: Client<HttpConnector, Body>,
    origin: OriginUrl,
    node_id: HeaderValue,
}

impl ReverseProxy {
    /// Creates a relay to `origin` identifying itself as `node_id`.
    pub fn new(origin: OriginUrl, node_id: &str) -> Result<Self, InvalidHeaderValue> {
        Ok(ReverseProxy {
            client: Client::builder(TokioExecutor::new()).build_http(),
            origin,
            node_id: HeaderValue::from_str(node_id)?,
        })
    }

    fn outbound(&self, request: Request<Body>) -> Result<Request<Body>, http::Error> {
        let client_ip = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        let (mut parts, body) = request.into_parts();

        let forwarded_host = parts.headers.get(HOST).cloned().or_else(|| {
            parts
                .uri
                .authority()
                .and_then(|authority| HeaderValue::from_str(authority.as_str()).ok())
        });
        let prior_for: Vec<String> = parts
            .headers
            .get_all(&X_FORWARDED_FOR)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_owned)
            .collect();

        parts.uri = self.origin.rewrite(&parts.uri)?;
        parts.version = Version::HTTP_11;

        let headers = &mut parts.headers;
        remove_hop_by_hop(headers);
        for name in [FORWARDED, X_FORWARDED_FOR, X_FORWARDED_HOST, X_FORWARDED_PROTO] {
            headers.remove(name);
        }
        headers.insert(HOST, self.origin.host_header().clone());
        if let Some(value) = client_ip.and_then(|ip| forwarded_for(&prior_for, ip)) {
            headers.insert(X_FORWARDED_FOR, value);
        }
        if let Some(host) = forwarded_host {
            headers.insert(X_FORWARDED_HOST, host);
        }
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
        headers.insert(NODE_ID_HEADER, self.node_id.clone());

        Ok(Request::from_parts(parts, body))
    }
}

impl Passthrough<Body> for ReverseProxy {
    fn forward(&self, request: Request<Body>) -> BoxFuture<'_, Response<PopBody>> {
        Box::pin(async move {
            let method = request.method().clone();
            let request = match self.outbound(request) {
                Ok(request) => request,
                Err(err) => {
                    error!(%method, error = %err, "failed to build proxied request");
                    return bad_gateway();
                }
            };
            debug!(%method, uri = %request.uri(), "relaying to origin");

            match self.client.request(request).await {
                Ok(response) => {
                    let (mut parts, body) = response.into_parts();
                    remove_hop_by_hop(&mut parts.headers);
                    let body = body
                        .map_err(|err| Box::new(err) as BoxError)
                        .boxed_unsync();
                    Response::from_parts(parts, body)
                }
                Err(err) => {
                    error!(%method, error = %err, "proxy error");
                    bad_gateway()
                }
            }
        })
    }
}

fn forwarded_for(prior: &[String], ip: IpAddr) -> Option<HeaderValue> {
    let mut value = prior.join(", ");
    if !value.is_empty() {
        value.push_str(", ");
    }
    value.push_str(&ip.to_string());
    HeaderValue::from_str(&value).ok()
}

fn bad_gateway() -> Response<PopBody> {
    let mut response = Response::new(empty());
    *response.status_mut() = StatusCode::BAD_GATEWAY;
    response
}
