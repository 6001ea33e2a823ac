//! Immutable snapshot of an origin response.

use chrono::{DateTime, Utc};
use http::{HeaderMap, Response, StatusCode};

use crate::Raw;
use crate::directive::ParsedDirectives;

/// An origin response captured at the moment it was stored.
///
/// Fields are private and there are no setters: a newer fetch replaces the
/// whole snapshot in the store rather than editing one in place. Cloning is
/// cheap for the body (reference counted) but copies the header map.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use chrono::Utc;
/// use http::{HeaderMap, StatusCode};
/// use popcache_core::StoredResponse;
///
/// let stored = StoredResponse::new(StatusCode::OK, HeaderMap::new(), Bytes::from_static(b"hello"), Utc::now());
/// assert_eq!(stored.status(), StatusCode::OK);
/// assert_eq!(stored.body().as_ref(), b"hello");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Raw,
    stored_at: DateTime<Utc>,
}

impl StoredResponse {
    /// Creates a snapshot from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Raw, stored_at: DateTime<Utc>) -> Self {
        StoredResponse {
            status,
            headers,
            body,
            stored_at,
        }
    }

    /// Status code of the stored response.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Headers of the stored response, in their original order.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body of the stored response.
    #[inline]
    pub fn body(&self) -> &Raw {
        &self.body
    }

    /// When the response was captured.
    #[inline]
    pub fn stored_at(&self) -> DateTime<Utc> {
        self.stored_at
    }

    /// Parses the stored headers into directives.
    pub fn directives(&self) -> ParsedDirectives {
        ParsedDirectives::parse(&self.headers)
    }

    /// Builds a response replaying status, every header value and the body.
    ///
    /// The snapshot itself is left untouched.
    pub fn to_response(&self) -> Response<Raw> {
        let mut response = Response::new(self.body.clone());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        response
    }
}
