use bytes::Bytes;
use http_body_util::{BodyExt, Empty, Full, combinators::UnsyncBoxBody};

/// Boxed error type carried by response bodies and collaborator failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Body of every response the orchestrator produces.
///
/// Cached and origin responses are fully buffered; relayed non-`GET`
/// responses may stream.
pub type PopBody = UnsyncBoxBody<Bytes, BoxError>;

/// Wraps already buffered bytes.
pub fn full(bytes: impl Into<Bytes>) -> PopBody {
    Full::new(bytes.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// An empty body.
pub fn empty() -> PopBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}
