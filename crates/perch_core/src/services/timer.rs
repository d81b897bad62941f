//! Single-slot cancelable delay timer.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::select;
use tokio_util::sync::CancellationToken;

/// Identifies one arming of a [`DelayTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct ScheduledTask {
    id: TimerId,
    cancel_token: CancellationToken,
}

/// Holds at most one pending deferred callback.
///
/// Arming the timer disarms whatever was pending before, so there is never
/// more than one live task per timer. Callbacks run on the runtime the timer
/// was created with.
///
/// On a multi-threaded runtime a callback can already be running when
/// `cancel` is called. Owners that share state with the callback check
/// [`DelayTimer::complete`] under their own lock to discard such stale fires.
pub struct DelayTimer {
    runtime: Handle,
    pending: Option<ScheduledTask>,
    next_id: u64,
}

impl DelayTimer {
    /// Create an unarmed timer driven by the given runtime.
    pub fn new(runtime: Handle) -> Self {
        Self { runtime, pending: None, next_id: 0 }
    }

    /// Arm the timer, replacing any pending callback.
    ///
    /// The callback receives the id this call returns.
    pub fn schedule<F>(&mut self, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce(TimerId) + Send + 'static,
    {
        self.cancel();

        let id = TimerId(self.next_id);
        self.next_id += 1;

        let cancel_token = CancellationToken::new();
        let task_token = cancel_token.clone();
        self.runtime.spawn(async move {
            select! {
                biased;
                _ = task_token.cancelled() => {
                    tracing::trace!(timer = id.0, "Timer cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    if !task_token.is_cancelled() {
                        callback(id);
                    }
                }
            }
        });

        tracing::trace!(timer = id.0, delay_ms = delay.as_millis() as u64, "Timer armed");
        self.pending = Some(ScheduledTask { id, cancel_token });
        id
    }

    /// Disarm the pending callback, if any.
    ///
    /// Returns whether something was pending. Cancelling an unarmed timer is a no-op.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(task) => {
                task.cancel_token.cancel();
                true
            }
            None => false,
        }
    }

    /// Mark `id` as fired. Returns false when `id` is no longer the pending arming.
    pub fn complete(&mut self, id: TimerId) -> bool {
        if self.pending.as_ref().is_some_and(|task| task.id == id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Whether a callback is pending.
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Id of the pending arming.
    pub fn pending_id(&self) -> Option<TimerId> {
        self.pending.as_ref().map(|task| task.id)
    }
}

impl Drop for DelayTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for DelayTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelayTimer").field("pending", &self.pending_id()).finish()
    }
}
