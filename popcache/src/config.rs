use std::fmt;
use std::str::FromStr;

use http::uri::{Authority, InvalidUri, Scheme};
use http::{HeaderValue, Uri};
use thiserror::Error;

/// Error raised while reading the cache configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The origin address is not a valid URI.
    #[error("invalid origin URL {url:?}: {source}")]
    InvalidUri {
        /// The rejected input.
        url: String,
        /// Underlying parse error.
        #[source]
        source: InvalidUri,
    },
    /// The origin address has no scheme.
    #[error("origin URL {0:?} has no scheme")]
    MissingScheme(String),
    /// The origin address uses a scheme other than `http`.
    #[error("origin URL {0:?} must use the http scheme")]
    UnsupportedScheme(String),
    /// The origin address has no host.
    #[error("origin URL {0:?} has no host")]
    MissingAuthority(String),
}

/// Base address of the origin server: `http://` plus host and optional port.
///
/// Origins are reached over plain HTTP, so any other scheme is rejected at
/// parse time instead of failing on every fetch.
///
/// Any path on the configured address is ignored; origin requests reuse the
/// path and query of the incoming request.
///
/// ```
/// use popcache::OriginUrl;
///
/// let origin = OriginUrl::parse("http://origin.internal:8888").unwrap();
/// let rewritten = origin.rewrite(&"/a?x=1".parse().unwrap()).unwrap();
/// assert_eq!(rewritten.to_string(), "http://origin.internal:8888/a?x=1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginUrl {
    scheme: Scheme,
    authority: Authority,
    host: HeaderValue,
}

impl OriginUrl {
    /// Parses an origin base address such as `http://localhost:8888`.
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let uri: Uri = url.parse().map_err(|source| ConfigError::InvalidUri {
            url: url.to_owned(),
            source,
        })?;
        let parts = uri.into_parts();
        let scheme = parts
            .scheme
            .ok_or_else(|| ConfigError::MissingScheme(url.to_owned()))?;
        if scheme != Scheme::HTTP {
            return Err(ConfigError::UnsupportedScheme(url.to_owned()));
        }
        let authority = parts
            .authority
            .ok_or_else(|| ConfigError::MissingAuthority(url.to_owned()))?;
        let host = HeaderValue::from_str(authority.as_str())
            .map_err(|_| ConfigError::MissingAuthority(url.to_owned()))?;
        Ok(OriginUrl {
            scheme,
            authority,
            host,
        })
    }

    /// Scheme of the origin.
    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Host and port of the origin.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Value for the `Host` header of requests sent to the origin.
    pub fn host_header(&self) -> &HeaderValue {
        &self.host
    }

    /// Points `uri` at the origin, keeping its path and query.
    pub fn rewrite(&self, uri: &Uri) -> Result<Uri, http::Error> {
        let path_and_query = uri
            .path_and_query()
            .map(|path_and_query| path_and_query.as_str())
            .unwrap_or("/");
        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}

impl FromStr for OriginUrl {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OriginUrl::parse(s)
    }
}

impl fmt::Display for OriginUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}
