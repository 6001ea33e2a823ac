//! Request-rate meter reported as the node load.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use http::Request;
use tower::{Layer, Service};

/// Default averaging window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
struct Bucket {
    second: u64,
    count: u64,
}

/// Counts requests in one-second buckets and reports the average rate over
/// a sliding window.
#[derive(Debug)]
pub struct RpsMeter {
    started: Instant,
    window: u64,
    buckets: Mutex<VecDeque<Bucket>>,
}

impl RpsMeter {
    /// Creates a meter averaging over `window`, rounded up to whole seconds.
    pub fn new(window: Duration) -> Self {
        let window = window.as_secs() + u64::from(window.subsec_nanos() > 0);
        RpsMeter {
            started: Instant::now(),
            window: window.max(1),
            buckets: Mutex::new(VecDeque::new()),
        }
    }

    /// Counts one request.
    pub fn record(&self) {
        self.record_at(self.elapsed_secs());
    }

    /// Average requests per second over the window ending now.
    pub fn rps(&self) -> f64 {
        self.rps_at(self.elapsed_secs())
    }

    fn elapsed_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    fn record_at(&self, second: u64) {
        let mut buckets = self.lock();
        match buckets.back_mut() {
            Some(bucket) if bucket.second == second => bucket.count += 1,
            _ => buckets.push_back(Bucket { second, count: 1 }),
        }
        let oldest = second.saturating_sub(self.window - 1);
        while buckets.front().is_some_and(|bucket| bucket.second < oldest) {
            buckets.pop_front();
        }
    }

    fn rps_at(&self, second: u64) -> f64 {
        let oldest = second.saturating_sub(self.window - 1);
        let total: u64 = self
            .lock()
            .iter()
            .filter(|bucket| bucket.second >= oldest && bucket.second <= second)
            .map(|bucket| bucket.count)
            .sum();
        total as f64 / self.window as f64
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Bucket>> {
        // A poisoned meter still holds valid counts.
        self.buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RpsMeter {
    fn default() -> Self {
        RpsMeter::new(DEFAULT_WINDOW)
    }
}

/// Layer counting every request passing through into an [`RpsMeter`].
#[derive(Debug, Clone)]
pub struct RpsLayer {
    meter: Arc<RpsMeter>,
}

impl RpsLayer {
    /// Creates a layer recording into `meter`.
    pub fn new(meter: Arc<RpsMeter>) -> Self {
        RpsLayer { meter }
    }
}

impl<S> Layer<S> for RpsLayer {
    type Service = RpsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RpsService {
            inner,
            meter: Arc::clone(&self.meter),
        }
    }
}

/// Service produced by [`RpsLayer`].
#[derive(Debug, Clone)]
pub struct RpsService<S> {
    inner: S,
    meter: Arc<RpsMeter>,
}

impl<S, B> Service<Request<B>> for RpsService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        self.meter.record();
        self.inner.call(request)
    }
}
