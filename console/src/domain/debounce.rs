//! Trailing-edge debounce for search input.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Default quiet period before search text is committed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

struct Pending {
    handle: JoinHandle<()>,
    fired: Arc<AtomicBool>,
}

/// Runs the most recently scheduled task once no newer task has been
/// scheduled for `delay`.
///
/// Rescheduling cancels a task still waiting out its delay. A task whose
/// delay has elapsed runs to completion.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<Pending>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Option<Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Schedule `task`, replacing any task still waiting.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let fired = Arc::new(AtomicBool::new(false));
        let started = Arc::clone(&fired);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if claim(&started) {
                task.await;
            }
        });
        let previous = self.pending().replace(Pending { handle, fired });
        if let Some(previous) = previous {
            cancel_waiting(&previous);
        }
    }

    /// Cancel the task still waiting, if any. Returns whether one was
    /// cancelled.
    pub fn cancel(&self) -> bool {
        self.pending().take().is_some_and(|pending| cancel_waiting(&pending))
    }

    /// Whether a task is scheduled or running.
    pub fn is_pending(&self) -> bool {
        self.pending()
            .as_ref()
            .is_some_and(|pending| !pending.handle.is_finished())
    }

    /// Wait until the latest scheduled task has finished or been cancelled.
    pub async fn settle(&self) {
        let pending = self.pending().take();
        if let Some(pending) = pending {
            // A cancelled task reports a JoinError; either way it is done.
            drop(pending.handle.await);
        }
    }
}

/// Whoever flips `fired` first owns the task: the timer runs it, a
/// canceller aborts it. Never both.
fn claim(fired: &AtomicBool) -> bool {
    fired
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
}

fn cancel_waiting(pending: &Pending) -> bool {
    if !claim(&pending.fired) {
        return false;
    }
    pending.handle.abort();
    true
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending().take() {
            cancel_waiting(&pending);
        }
    }
}
