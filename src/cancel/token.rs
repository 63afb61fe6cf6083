use std::future::Future;
use std::panic;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::AbortHandle;

use crate::error::{Result, TuiError};

#[derive(Default)]
struct TokenState {
    cancelled: AtomicBool,
    next_id: AtomicU64,
    current: Mutex<Option<(u64, AbortHandle)>>,
}

impl TokenState {
    fn current(&self) -> std::sync::MutexGuard<'_, Option<(u64, AbortHandle)>> {
        self.current.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Cooperative cancellation flag shared by every clone.
///
/// Work passed to [`run`](Self::run) is spawned as its own tokio task, so `cancel` from any
/// thread aborts it at its next await point.
#[derive(Clone, Default)]
pub struct CancellationToken {
    state: Arc<TokenState>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        tracing::debug!("cancellation requested");
        if let Some((id, handle)) = self.state.current().as_ref() {
            tracing::debug!(task = id, "aborting tracked task");
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Clears the flag and forgets the tracked task so the token can wrap the next operation.
    pub fn reset(&self) {
        self.state.cancelled.store(false, Ordering::SeqCst);
        self.state.current().take();
    }

    /// Runs `work` to completion unless cancelled first.
    ///
    /// Fails with [`TuiError::Cancelled`] without polling `work` when the token is already
    /// cancelled. A panic inside `work` is resumed on the caller.
    pub async fn run<F>(&self, work: F) -> Result<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        if self.is_cancelled() {
            return Err(TuiError::Cancelled);
        }

        let task = tokio::spawn(work);
        let id = self.state.next_id.fetch_add(1, Ordering::Relaxed);
        *self.state.current() = Some((id, task.abort_handle()));
        let _tracked = Tracked {
            state: &self.state,
            id,
            handle: task.abort_handle(),
        };

        // cancel() may have run between the first check and tracking.
        if self.is_cancelled() {
            task.abort();
        }

        match task.await {
            Ok(output) => Ok(output),
            Err(err) if err.is_cancelled() => Err(TuiError::Cancelled),
            Err(err) => panic::resume_unwind(err.into_panic()),
        }
    }
}

/// Untracks the task when `run` finishes or is dropped mid-await.
struct Tracked<'a> {
    state: &'a TokenState,
    id: u64,
    handle: AbortHandle,
}

impl Drop for Tracked<'_> {
    fn drop(&mut self) {
        let mut current = self.state.current();
        if matches!(current.as_ref(), Some((id, _)) if *id == self.id) {
            current.take();
        }
        // No-op when the task already finished.
        self.handle.abort();
    }
}
