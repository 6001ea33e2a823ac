use bytes::Bytes;
use futures::future::BoxFuture;
use http::header::{ALLOW, HeaderValue};
use http::{Request, Response, StatusCode};
use http_body::Body as HttpBody;
use http_body_util::Empty;

use crate::body::{BoxError, PopBody, empty};

/// Performs origin fetches for `GET` requests.
///
/// The orchestrator hands over a request already pointed at the origin:
/// absolute URI, `Host` rewritten, end-to-end headers kept, empty body. An
/// `Err` means the exchange failed before a response head arrived and is
/// surfaced as `502 Bad Gateway`. Errors while reading the returned body are
/// surfaced separately as `500 Internal Server Error`.
///
/// # Examples
///
/// ```rust,ignore
/// use futures::future::{BoxFuture, FutureExt};
/// use http_body_util::Full;
///
/// struct Static;
///
/// impl Upstream for Static {
///     type Body = Full<Bytes>;
///     type Error = std::convert::Infallible;
///
///     fn call(&self, _req: Request<Empty<Bytes>>) -> BoxFuture<'_, Result<Response<Self::Body>, Self::Error>> {
///         async { Ok(Response::new(Full::new(Bytes::from_static(b"hello")))) }.boxed()
///     }
/// }
/// ```
pub trait Upstream: Send + Sync {
    /// Body of origin responses.
    type Body: HttpBody<Data = Bytes, Error: Into<BoxError>> + Send + 'static;

    /// Transport error.
    type Error: Into<BoxError> + Send;

    /// Sends `request` to the origin.
    fn call(
        &self,
        request: Request<Empty<Bytes>>,
    ) -> BoxFuture<'_, Result<Response<Self::Body>, Self::Error>>;
}

/// Relays requests that never touch the cache (every method but `GET`).
///
/// Implementations forward the request to the origin and relay the response
/// unmodified. Failures are turned into a response by the implementation.
pub trait Passthrough<ReqBody>: Send + Sync {
    /// Forwards `request` and returns the response for the caller.
    fn forward(&self, request: Request<ReqBody>) -> BoxFuture<'_, Response<PopBody>>;
}

/// [`Passthrough`] for deployments that only serve `GET`.
///
/// Answers every request with `405 Method Not Allowed` and `Allow: GET`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPassthrough;

impl<ReqBody> Passthrough<ReqBody> for DisabledPassthrough
where
    ReqBody: Send + 'static,
{
    fn forward(&self, _request: Request<ReqBody>) -> BoxFuture<'_, Response<PopBody>> {
        let mut response = Response::new(empty());
        *response.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
        response
            .headers_mut()
            .insert(ALLOW, HeaderValue::from_static("GET"));
        Box::pin(futures::future::ready(response))
    }
}
