//! Tooltip trigger adapter.
//!
//! Translates pointer and focus events on one host element into
//! coordinator requests. A disabled trigger ignores every event.
//!
//! Triggers expect host events to be delivered from the thread driving a
//! current-thread runtime. The focus suppression after a pointer-down is
//! cleared by a spawned task, which on a multi-threaded runtime may run
//! before the host delivers the follow-up focus event.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use perch_core::{AnchorElement, TooltipCoordinator};
use tokio::runtime::Handle;

use crate::tooltip::Tooltip;

/// Binds a [`Tooltip`] to a host element within one group.
pub struct TooltipTrigger {
    tooltip: Tooltip,
    element: Arc<dyn AnchorElement>,
    coordinator: TooltipCoordinator,
    runtime: Handle,
    disabled: AtomicBool,
    // Set by pointer-down, cleared on the next scheduler tick
    suppress_next_focus: Arc<AtomicBool>,
}

impl TooltipTrigger {
    pub fn new(
        tooltip: Tooltip,
        element: Arc<dyn AnchorElement>,
        coordinator: TooltipCoordinator,
        runtime: Handle,
    ) -> Self {
        Self {
            tooltip,
            element,
            coordinator,
            runtime,
            disabled: AtomicBool::new(false),
            suppress_next_focus: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> &str {
        self.tooltip.id()
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    /// Whether the next focus event will be ignored.
    pub fn is_focus_suppressed(&self) -> bool {
        self.suppress_next_focus.load(Ordering::SeqCst)
    }

    /// Whether this trigger's tooltip is the group's current one.
    pub fn is_current(&self) -> bool {
        self.coordinator.current_tooltip().is_some_and(|current| current.id == self.id())
    }

    // ========== Host events ==========

    pub fn pointer_enter(&self) {
        if self.is_disabled() {
            return;
        }
        self.open();
    }

    pub fn pointer_leave(&self) {
        if self.is_disabled() {
            return;
        }
        self.coordinator.hide_tooltip();
    }

    pub fn focus_in(&self) {
        if self.is_disabled() {
            return;
        }
        if self.is_focus_suppressed() {
            tracing::trace!(tooltip_id = %self.id(), "Focus after pointer-down ignored");
            return;
        }
        self.open();
    }

    pub fn focus_out(&self) {
        if self.is_disabled() {
            return;
        }
        self.coordinator.hide_tooltip();
    }

    /// Clicking a trigger whose tooltip is shown dismisses it at once.
    ///
    /// The focus event that usually follows a pointer-down on the same
    /// element is swallowed so it does not reopen the tooltip. The flag
    /// clears on the runtime's next scheduling turn.
    pub fn pointer_down(&self) {
        if self.is_disabled() || !self.is_current() {
            return;
        }

        self.suppress_next_focus.store(true, Ordering::SeqCst);
        self.coordinator.hide_immediate();

        let flag = self.suppress_next_focus.clone();
        self.runtime.spawn(async move {
            flag.store(false, Ordering::SeqCst);
        });
    }

    fn open(&self) {
        let rect = self.element.bounding_rect();
        self.coordinator.set_reference_el(Some(&self.element));
        self.coordinator.show_tooltip(self.tooltip.descriptor(rect));
    }
}

impl std::fmt::Debug for TooltipTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TooltipTrigger")
            .field("id", &self.id())
            .field("disabled", &self.is_disabled())
            .finish()
    }
}
