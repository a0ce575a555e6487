use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag shared between a controller and workers.
///
/// Clones observe the same flag. Workers poll [`CancelToken::is_cancelled`]
/// at stage boundaries; nothing is interrupted mid-loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns `Err(stage)` if cancellation was requested, tagging the
    /// checkpoint that observed it.
    pub fn checkpoint<S>(&self, stage: S) -> Result<(), S> {
        if self.is_cancelled() {
            Err(stage)
        } else {
            Ok(())
        }
    }
}
