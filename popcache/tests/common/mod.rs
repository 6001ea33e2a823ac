#![allow(dead_code)]

use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeDelta, Utc};
use futures::future::BoxFuture;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Request, Response, StatusCode, Uri};
use http_body::Frame;
use http_body_util::{BodyExt, Empty};
use popcache::body::full;
use popcache::{
    Backend, BackendError, DisabledPassthrough, MemoryBackend, Offload, OriginUrl, Passthrough,
    PopBody, PopCache, RequestKey, StoredResponse, TimeProvider, Upstream,
};
use popcache_backend::BackendResult;
use smol_str::SmolStr;

pub const ORIGIN: &str = "http://origin.test:8888";

/// What the mock origin does with the next request.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond {
        status: StatusCode,
        headers: Vec<(&'static str, &'static str)>,
        body: Bytes,
    },
    /// Fails before a response head is produced.
    Unreachable,
    /// Sends the head, then fails while the body is read.
    BrokenBody { status: StatusCode },
}

impl Reply {
    pub fn ok(headers: Vec<(&'static str, &'static str)>, body: &'static str) -> Self {
        Reply::Respond {
            status: StatusCode::OK,
            headers,
            body: Bytes::from_static(body.as_bytes()),
        }
    }
}

/// A request as seen by the origin.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

/// Scripted origin that counts and records every fetch.
#[derive(Debug, Clone)]
pub struct MockUpstream {
    reply: Arc<Mutex<Reply>>,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl MockUpstream {
    pub fn new(reply: Reply) -> Self {
        MockUpstream {
            reply: Arc::new(Mutex::new(reply)),
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

impl Upstream for MockUpstream {
    type Body = MockBody;
    type Error = io::Error;

    fn call(
        &self,
        request: Request<Empty<Bytes>>,
    ) -> BoxFuture<'_, Result<Response<Self::Body>, Self::Error>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(Seen {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
        });
        let reply = self.reply.lock().unwrap().clone();

        Box::pin(async move {
            match reply {
                Reply::Respond {
                    status,
                    headers,
                    body,
                } => {
                    let mut response = Response::new(MockBody::Full(Some(body)));
                    *response.status_mut() = status;
                    for (name, value) in headers {
                        response.headers_mut().append(
                            HeaderName::from_static(name),
                            HeaderValue::from_static(value),
                        );
                    }
                    Ok(response)
                }
                Reply::Unreachable => Err(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )),
                Reply::BrokenBody { status } => {
                    let mut response = Response::new(MockBody::Broken);
                    *response.status_mut() = status;
                    Ok(response)
                }
            }
        })
    }
}

/// Origin response body: either the whole payload in one frame or an error.
#[derive(Debug)]
pub enum MockBody {
    Full(Option<Bytes>),
    Broken,
}

impl http_body::Body for MockBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            MockBody::Full(body) => Poll::Ready(body.take().map(|body| Ok(Frame::data(body)))),
            MockBody::Broken => Poll::Ready(Some(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )))),
        }
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct MockTimeProvider {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockTimeProvider {
    pub fn new(now: DateTime<Utc>) -> Self {
        MockTimeProvider {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        *self.now.lock().unwrap() += TimeDelta::seconds(secs);
    }
}

impl TimeProvider for MockTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Relay that records the methods it was handed and answers `201`.
#[derive(Debug, Clone, Default)]
pub struct RecordingPassthrough {
    methods: Arc<Mutex<Vec<Method>>>,
}

impl RecordingPassthrough {
    pub fn methods(&self) -> Vec<Method> {
        self.methods.lock().unwrap().clone()
    }
}

impl<ReqBody: Send + 'static> Passthrough<ReqBody> for RecordingPassthrough {
    fn forward(&self, request: Request<ReqBody>) -> BoxFuture<'_, Response<PopBody>> {
        self.methods.lock().unwrap().push(request.method().clone());
        Box::pin(async {
            let mut response = Response::new(full("relayed"));
            *response.status_mut() = StatusCode::CREATED;
            response
        })
    }
}

/// Offload that keeps spawned tasks until the test runs them.
#[derive(Clone, Default)]
pub struct QueuedOffload {
    tasks: Arc<Mutex<Vec<(SmolStr, BoxFuture<'static, ()>)>>>,
}

impl QueuedOffload {
    pub fn kinds(&self) -> Vec<String> {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .map(|(kind, _)| kind.to_string())
            .collect()
    }

    pub async fn run_all(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap());
        for (_, task) in tasks {
            task.await;
        }
    }
}

impl Offload for QueuedOffload {
    fn spawn<F>(&self, kind: impl Into<SmolStr>, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks
            .lock()
            .unwrap()
            .push((kind.into(), Box::pin(future)));
    }
}

/// Store whose every read and write fails.
#[derive(Debug, Default)]
pub struct FailingBackend {
    writes: AtomicUsize,
}

impl FailingBackend {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for FailingBackend {
    async fn read(&self, _key: &RequestKey) -> BackendResult<Option<Arc<StoredResponse>>> {
        Err(BackendError::ConnectionError(Box::new(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "store unreachable",
        ))))
    }

    async fn write(&self, _key: &RequestKey, _value: StoredResponse) -> BackendResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(BackendError::InternalError("store is read-only".into()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

pub type TestCache = PopCache<MemoryBackend, MockUpstream, RecordingPassthrough>;

/// Cache in front of `upstream` with a frozen clock.
pub fn cache(upstream: MockUpstream) -> (TestCache, MockTimeProvider, RecordingPassthrough) {
    let time = MockTimeProvider::new(Utc::now());
    let passthrough = RecordingPassthrough::default();
    let cache = PopCache::new(
        OriginUrl::parse(ORIGIN).unwrap(),
        MemoryBackend::new(),
        upstream,
    )
    .passthrough(passthrough.clone())
    .time_provider(time.clone());
    (cache, time, passthrough)
}

/// Cache without a relay, for tests that only issue `GET`.
pub fn get_only_cache(
    upstream: MockUpstream,
) -> PopCache<MemoryBackend, MockUpstream, DisabledPassthrough> {
    PopCache::new(
        OriginUrl::parse(ORIGIN).unwrap(),
        MemoryBackend::new(),
        upstream,
    )
}

pub fn get(uri: &str) -> Request<()> {
    Request::get(uri).body(()).unwrap()
}

pub async fn body_string(response: Response<PopBody>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
