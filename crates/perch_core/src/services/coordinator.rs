//! Tooltip group coordinator.
//!
//! One coordinator exists per mounted tooltip group. It decides which tooltip
//! is current, debounces open and close requests coming from sibling
//! triggers, and publishes the current descriptor to the shared overlay.
//!
//! Opening follows two rules:
//! - **fast switch**: while a tooltip is shown, a new one replaces it at once;
//! - **cold start**: otherwise the open waits `open_delay`, unless the last
//!   close happened less than `close_delay` ago, in which case it opens at once.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::config::GroupConfig;
use crate::models::{AnchorElement, TooltipDescriptor};
use crate::services::timer::DelayTimer;

/// Shared, read-only view of the current tooltip.
pub type CurrentTooltip = Option<Arc<TooltipDescriptor>>;

/// Where the coordinator stands in the open/close cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipPhase {
    /// Nothing shown and no open pending.
    Closed,
    /// Waiting out the open delay.
    PendingOpen,
    /// A tooltip is current.
    Open,
    /// A tooltip is current and its close delay is running.
    PendingClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Open,
    Close,
}

struct CoordinatorInner {
    timer: DelayTimer,
    // Some exactly while `timer` is armed
    pending: Option<PendingKind>,
    current: watch::Sender<CurrentTooltip>,
    reference_el: Option<Weak<dyn AnchorElement>>,
    last_close: Option<Instant>,
    open_delay: Duration,
    close_delay: Duration,
    shut_down: bool,
}

impl CoordinatorInner {
    fn cancel_pending(&mut self) {
        if self.timer.cancel() {
            tracing::trace!(pending = ?self.pending, "Cancelled pending transition");
        }
        self.pending = None;
    }

    fn publish(&mut self, next: CurrentTooltip) {
        self.current.send_if_modified(move |current| {
            let changed = current.is_some() || next.is_some();
            *current = next;
            changed
        });
    }

    fn close_now(&mut self) {
        self.publish(None);
        self.last_close = Some(Instant::now());
    }

    fn is_showing(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Open delay for a show request arriving while nothing is shown.
    fn cold_open_delay(&self, now: Instant) -> Duration {
        match self.last_close {
            Some(closed_at) if now.saturating_duration_since(closed_at) < self.close_delay => {
                Duration::ZERO
            }
            _ => self.open_delay,
        }
    }
}

/// Per-group tooltip coordinator.
///
/// Cloning yields another handle to the same group state. Only the
/// coordinator writes the current tooltip; everyone else reads it through
/// [`TooltipCoordinator::current_tooltip`] or [`TooltipCoordinator::subscribe`].
#[derive(Clone)]
pub struct TooltipCoordinator {
    inner: Arc<Mutex<CoordinatorInner>>,
    group_id: Arc<str>,
}

impl TooltipCoordinator {
    /// Create a coordinator whose timers run on `runtime`.
    pub fn new(group_id: impl Into<String>, config: &GroupConfig, runtime: Handle) -> Self {
        let group_id: Arc<str> = Arc::from(group_id.into());
        let (current, _) = watch::channel(None);

        tracing::debug!(
            group_id = %group_id,
            open_delay_ms = config.open_delay_ms,
            close_delay_ms = config.close_delay_ms,
            "Tooltip coordinator created"
        );

        Self {
            inner: Arc::new(Mutex::new(CoordinatorInner {
                timer: DelayTimer::new(runtime),
                pending: None,
                current,
                reference_el: None,
                last_close: None,
                open_delay: config.open_delay(),
                close_delay: config.close_delay(),
                shut_down: false,
            })),
            group_id,
        }
    }

    /// Identity of the group this coordinator serves.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    // ========== Operations ==========

    /// Request that `descriptor` become the current tooltip.
    pub fn show_tooltip(&self, descriptor: TooltipDescriptor) {
        let descriptor = Arc::new(descriptor);
        let mut inner = self.inner.lock();
        if inner.shut_down {
            tracing::trace!(group_id = %self.group_id, "Ignoring show after shutdown");
            return;
        }

        inner.cancel_pending();

        if inner.is_showing() {
            tracing::debug!(
                group_id = %self.group_id,
                tooltip_id = %descriptor.id,
                "Switching tooltip"
            );
            inner.publish(Some(descriptor));
            return;
        }

        let delay = inner.cold_open_delay(Instant::now());
        if delay.is_zero() {
            tracing::debug!(
                group_id = %self.group_id,
                tooltip_id = %descriptor.id,
                "Opening tooltip"
            );
            inner.publish(Some(descriptor));
            return;
        }

        tracing::trace!(
            group_id = %self.group_id,
            tooltip_id = %descriptor.id,
            delay_ms = delay.as_millis() as u64,
            "Scheduling tooltip open"
        );
        let group_id = self.group_id.clone();
        self.arm(&mut inner, delay, PendingKind::Open, move |inner| {
            tracing::debug!(group_id = %group_id, tooltip_id = %descriptor.id, "Opening tooltip");
            inner.publish(Some(descriptor));
        });
    }

    /// Close the current tooltip after the close delay.
    ///
    /// A show request arriving before the delay elapses cancels the close.
    pub fn hide_tooltip(&self) {
        let mut inner = self.inner.lock();
        if inner.shut_down {
            return;
        }

        inner.cancel_pending();

        let delay = inner.close_delay;
        if delay.is_zero() {
            inner.close_now();
            return;
        }

        let group_id = self.group_id.clone();
        self.arm(&mut inner, delay, PendingKind::Close, move |inner| {
            tracing::debug!(group_id = %group_id, "Closing tooltip");
            inner.close_now();
        });
    }

    /// Close the current tooltip synchronously and drop any pending transition.
    pub fn hide_immediate(&self) {
        let mut inner = self.inner.lock();
        if inner.shut_down {
            return;
        }

        inner.cancel_pending();
        if inner.is_showing() {
            tracing::debug!(group_id = %self.group_id, "Dismissing tooltip");
        }
        inner.close_now();
    }

    /// Point the overlay at a new reference element, or clear it.
    ///
    /// Does not change the current tooltip.
    pub fn set_reference_el(&self, element: Option<&Arc<dyn AnchorElement>>) {
        self.inner.lock().reference_el = element.map(Arc::downgrade);
    }

    /// Cancel pending work and clear the current tooltip. Further requests are ignored.
    ///
    /// Safe to call more than once.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        if inner.shut_down {
            return;
        }

        inner.cancel_pending();
        inner.publish(None);
        inner.reference_el = None;
        inner.shut_down = true;
        tracing::debug!(group_id = %self.group_id, "Tooltip coordinator shut down");
    }

    // ========== Reads ==========

    /// The tooltip currently shown, if any.
    pub fn current_tooltip(&self) -> CurrentTooltip {
        self.inner.lock().current.borrow().clone()
    }

    /// Receive every change of the current tooltip.
    pub fn subscribe(&self) -> watch::Receiver<CurrentTooltip> {
        self.inner.lock().current.subscribe()
    }

    /// The element the overlay should anchor to, if it is still alive.
    pub fn reference_element(&self) -> Option<Arc<dyn AnchorElement>> {
        self.inner.lock().reference_el.as_ref().and_then(Weak::upgrade)
    }

    pub fn phase(&self) -> TooltipPhase {
        let inner = self.inner.lock();
        match (inner.is_showing(), inner.pending) {
            (_, Some(PendingKind::Open)) => TooltipPhase::PendingOpen,
            (true, Some(PendingKind::Close)) => TooltipPhase::PendingClose,
            (true, None) => TooltipPhase::Open,
            (false, _) => TooltipPhase::Closed,
        }
    }

    /// When the last close completed.
    pub fn last_close(&self) -> Option<Instant> {
        self.inner.lock().last_close
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.lock().shut_down
    }

    fn arm<F>(&self, inner: &mut CoordinatorInner, delay: Duration, kind: PendingKind, apply: F)
    where
        F: FnOnce(&mut CoordinatorInner) + Send + 'static,
    {
        let shared = Arc::downgrade(&self.inner);
        inner.timer.schedule(delay, move |id| {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let mut inner = shared.lock();
            if !inner.timer.complete(id) {
                tracing::trace!("Discarding stale timer fire");
                return;
            }
            inner.pending = None;
            apply(&mut *inner);
        });
        inner.pending = Some(kind);
    }
}

impl std::fmt::Debug for TooltipCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TooltipCoordinator")
            .field("group_id", &self.group_id)
            .field("phase", &self.phase())
            .field("current", &self.current_tooltip().map(|d| d.id.clone()))
            .finish()
    }
}
