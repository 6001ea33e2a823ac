use std::future::Future;

use smol_str::SmolStr;

/// Runs work off the request path.
///
/// When a [`PopCache`](crate::PopCache) is given an offload, the store write
/// of a cache fill is handed to it and the origin response goes back to the
/// caller without waiting for the store. Without one the write is awaited
/// before the response is returned.
pub trait Offload: Send + Sync {
    /// Runs `future` in the background.
    ///
    /// `kind` labels the task in logs.
    fn spawn<F>(&self, kind: impl Into<SmolStr>, future: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Placeholder for caches that write to the store inline.
///
/// Has no values, so a cache typed with it never offloads.
#[derive(Debug, Clone, Copy)]
pub enum DisabledOffload {}

impl Offload for DisabledOffload {
    fn spawn<F>(&self, _kind: impl Into<SmolStr>, _future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match *self {}
    }
}
