use popcache::Offload;
use smol_str::SmolStr;
use tracing::trace;

/// Runs offloaded work on the ambient tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioOffload;

impl Offload for TokioOffload {
    fn spawn<F>(&self, kind: impl Into<SmolStr>, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let kind = kind.into();
        trace!(%kind, "offloading task");
        tokio::spawn(future);
    }
}
