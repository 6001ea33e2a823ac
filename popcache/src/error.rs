use http::header::{CONTENT_TYPE, HeaderValue, X_CONTENT_TYPE_OPTIONS};
use http::{Response, StatusCode};
use thiserror::Error;

use crate::body::{BoxError, PopBody, full};

/// Failure of a single in-flight request.
///
/// None of these is fatal to the process and none is retried. Each maps to
/// the status the caller receives.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The origin could not be reached or the exchange failed before a
    /// response head arrived.
    #[error("origin fetch failed: {0}")]
    Upstream(#[source] BoxError),
    /// The origin response head arrived but reading its body failed. The
    /// partial body is discarded and nothing is stored.
    #[error("failed to read origin response body: {0}")]
    Body(#[source] BoxError),
    /// The origin request could not be assembled from the incoming one.
    #[error("failed to build origin request: {0}")]
    Request(#[from] http::Error),
}

impl CacheError {
    /// Status code surfaced to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::Upstream(_) => StatusCode::BAD_GATEWAY,
            CacheError::Body(_) | CacheError::Request(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            CacheError::Upstream(_) => "Origin fetch failed\n",
            CacheError::Body(_) => "Failed to read response body\n",
            CacheError::Request(_) => "Internal Server Error\n",
        }
    }

    /// Renders the plain-text error response sent to the caller.
    pub fn into_response(self) -> Response<PopBody> {
        let mut response = Response::new(full(self.message()));
        *response.status_mut() = self.status_code();
        let headers = response.headers_mut();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        response
    }
}
