//! Cancellation signaling from an observer back to the task that owns it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

type CancelAction = Box<dyn Fn() + Send + Sync>;

struct CancelInner {
    requested: AtomicBool,
    action: CancelAction,
}

/// Result of asking a report (or handle) to cancel its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// This call delivered the cancellation signal.
    Requested,
    /// The signal had already been delivered; nothing happened.
    AlreadyRequested,
    /// The report carries no cancellation handle.
    NotCancelable,
}

/// Signals the producing task to stop.
///
/// Clones share state: the wrapped action runs at most once no matter how many
/// clones exist or how often `cancel` is called. The action must not block;
/// it is invoked on the caller's thread.
#[derive(Clone)]
pub struct CancelHandle {
    inner: Arc<CancelInner>,
}

impl CancelHandle {
    #[must_use]
    pub fn new<F>(action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(CancelInner {
                requested: AtomicBool::new(false),
                action: Box::new(action),
            }),
        }
    }

    pub fn cancel(&self) -> CancelOutcome {
        if self
            .inner
            .requested
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Cancellation already requested");
            return CancelOutcome::AlreadyRequested;
        }

        debug!("Delivering cancellation signal");
        (self.inner.action)();
        CancelOutcome::Requested
    }

    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::Acquire)
    }

    /// Whether both handles signal the same task.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for CancelHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle")
            .field("requested", &self.is_requested())
            .field("action", &"<callback>")
            .finish()
    }
}
