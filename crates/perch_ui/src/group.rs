//! Tooltip group composition.
//!
//! A mounted [`TooltipGroup`] owns one coordinator and the global dismiss
//! listeners registered on the host window. Triggers and the overlay are
//! handed out bound to that coordinator.

use std::sync::Arc;

use perch_core::{
    AnchorElement, EventKind, GroupConfig, HostEvent, HostWindow, Key, ListenerId, ListenerPhase,
    PerchError, TooltipCoordinator,
};
use tokio::runtime::Handle;
use uuid::Uuid;

use crate::motion::Animator;
use crate::overlay::TooltipOverlay;
use crate::placement::PlacementEngine;
use crate::tooltip::Tooltip;
use crate::trigger::TooltipTrigger;

/// A scope sharing one overlay and one timing policy across its triggers.
pub struct TooltipGroup {
    id: String,
    config: GroupConfig,
    coordinator: TooltipCoordinator,
    window: HostWindow,
    runtime: Handle,
    // Taken exactly once on unmount
    listeners: Option<Vec<ListenerId>>,
}

impl TooltipGroup {
    /// Mount a group on `window`, driving its timers with the ambient tokio runtime.
    pub fn mount(window: &HostWindow, config: GroupConfig) -> Result<Self, PerchError> {
        let runtime = Handle::try_current()?;
        Ok(Self::mount_on(window, config, runtime))
    }

    /// Mount a group whose timers run on `runtime`.
    pub fn mount_on(window: &HostWindow, config: GroupConfig, runtime: Handle) -> Self {
        let id = config.id.clone().unwrap_or_else(|| format!("tooltip-group-{}", Uuid::new_v4()));
        let coordinator = TooltipCoordinator::new(id.clone(), &config, runtime.clone());
        let listeners = register_dismiss_listeners(window, &coordinator);

        tracing::info!(group_id = %id, listeners = listeners.len(), "Tooltip group mounted");

        Self {
            id,
            config,
            coordinator,
            window: window.clone(),
            runtime,
            listeners: Some(listeners),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &TooltipCoordinator {
        &self.coordinator
    }

    pub fn is_mounted(&self) -> bool {
        self.listeners.is_some()
    }

    /// Bind `tooltip` to a host element in this group.
    pub fn trigger(&self, tooltip: Tooltip, element: Arc<dyn AnchorElement>) -> TooltipTrigger {
        TooltipTrigger::new(tooltip, element, self.coordinator.clone(), self.runtime.clone())
    }

    /// Create the group's overlay renderer.
    pub fn overlay(
        &self,
        placement: Arc<dyn PlacementEngine>,
        animator: Arc<dyn Animator>,
    ) -> TooltipOverlay {
        TooltipOverlay::new(self.coordinator.clone(), placement, animator)
    }

    /// Cancel pending timers and remove the dismiss listeners.
    ///
    /// Calling it again is a no-op.
    pub fn unmount(&mut self) {
        let Some(listeners) = self.listeners.take() else {
            return;
        };

        self.coordinator.shutdown();
        for id in listeners {
            self.window.remove_listener(id);
        }
        tracing::info!(group_id = %self.id, "Tooltip group unmounted");
    }
}

impl Drop for TooltipGroup {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for TooltipGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TooltipGroup")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

/// Escape, scroll and resize dismiss the group's tooltip at once.
///
/// Registered in the capture phase so the dismiss happens before any nested handler.
fn register_dismiss_listeners(
    window: &HostWindow,
    coordinator: &TooltipCoordinator,
) -> Vec<ListenerId> {
    let on_escape = coordinator.clone();
    let on_scroll = coordinator.clone();
    let on_resize = coordinator.clone();

    vec![
        window.add_listener(EventKind::KeyDown, ListenerPhase::Capture, move |event| {
            if matches!(event, HostEvent::KeyDown(Key::Escape)) {
                on_escape.hide_immediate();
            }
        }),
        window.add_listener(EventKind::Scroll, ListenerPhase::Capture, move |_| {
            on_scroll.hide_immediate();
        }),
        window.add_listener(EventKind::Resize, ListenerPhase::Capture, move |_| {
            on_resize.hide_immediate();
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{advance_ms, FakeElement, OriginPlacement, RecordingAnimator};
    use perch_core::{Rect, TooltipPhase};
    use std::time::Duration;

    fn element() -> Arc<dyn AnchorElement> {
        FakeElement::new(Rect::new(0.0, 0.0, 32.0, 32.0))
    }

    #[tokio::test]
    async fn test_mount_registers_listeners_and_unmount_removes_them() {
        let window = HostWindow::new();
        let mut group = TooltipGroup::mount(&window, GroupConfig::default()).unwrap();
        assert_eq!(window.listener_count(), 3);
        assert!(group.is_mounted());
        assert!(group.id().starts_with("tooltip-group-"));

        group.unmount();
        assert_eq!(window.listener_count(), 0);
        assert!(!group.is_mounted());

        group.unmount();
        drop(group);
        assert_eq!(window.listener_count(), 0);
    }

    #[test]
    fn test_mount_outside_runtime_fails() {
        let window = HostWindow::new();
        let err = TooltipGroup::mount(&window, GroupConfig::default()).unwrap_err();
        assert!(matches!(err, PerchError::Runtime { .. }));
        assert_eq!(window.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_explicit_group_id() {
        let window = HostWindow::new();
        let config = GroupConfig::default().with_id("toolbar");
        let group = TooltipGroup::mount(&window, config).unwrap();
        assert_eq!(group.id(), "toolbar");
        assert_eq!(group.coordinator().group_id(), "toolbar");
    }

    #[tokio::test]
    async fn test_global_events_dismiss_immediately() {
        let window = HostWindow::new();
        let config = GroupConfig::default().with_open_delay(Duration::ZERO);
        let group = TooltipGroup::mount(&window, config).unwrap();
        let trigger = group.trigger(Tooltip::with_id("a"), element());

        for event in [HostEvent::KeyDown(Key::Escape), HostEvent::Scroll, HostEvent::Resize] {
            trigger.pointer_enter();
            assert!(trigger.is_current(), "{event:?}");

            window.dispatch(&event);
            assert!(group.coordinator().current_tooltip().is_none(), "{event:?}");
        }
    }

    #[tokio::test]
    async fn test_other_keys_do_not_dismiss() {
        let window = HostWindow::new();
        let config = GroupConfig::default().with_open_delay(Duration::ZERO);
        let group = TooltipGroup::mount(&window, config).unwrap();
        let trigger = group.trigger(Tooltip::with_id("a"), element());

        trigger.pointer_enter();
        window.dispatch(&HostEvent::KeyDown(Key::Character('k')));
        assert!(trigger.is_current());
    }

    #[tokio::test]
    async fn test_escape_is_handled_before_nested_listeners() {
        let window = HostWindow::new();
        let config = GroupConfig::default().with_open_delay(Duration::ZERO);
        let group = TooltipGroup::mount(&window, config).unwrap();
        let trigger = group.trigger(Tooltip::with_id("a"), element());

        let seen = Arc::new(parking_lot::Mutex::new(None));
        let observer = group.coordinator().clone();
        let record = seen.clone();
        window.add_listener(EventKind::KeyDown, ListenerPhase::Bubble, move |_| {
            *record.lock() = Some(observer.current_tooltip().is_some());
        });

        trigger.pointer_enter();
        window.dispatch(&HostEvent::KeyDown(Key::Escape));
        assert_eq!(*seen.lock(), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_with_pending_timer_never_fires() {
        let window = HostWindow::new();
        let mut group = TooltipGroup::mount(&window, GroupConfig::default()).unwrap();
        let coordinator = group.coordinator().clone();
        let trigger = group.trigger(Tooltip::with_id("a"), element());

        trigger.pointer_enter();
        assert_eq!(coordinator.phase(), TooltipPhase::PendingOpen);

        group.unmount();
        advance_ms(2000).await;
        assert!(coordinator.current_tooltip().is_none());

        // Events after unmount reach nobody and requests are ignored.
        assert_eq!(window.dispatch(&HostEvent::Scroll), 0);
        trigger.pointer_enter();
        advance_ms(2000).await;
        assert!(coordinator.current_tooltip().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_with_pending_close_is_safe() {
        let window = HostWindow::new();
        let config = GroupConfig::default().with_open_delay(Duration::ZERO);
        let group = TooltipGroup::mount(&window, config).unwrap();
        let trigger = group.trigger(Tooltip::with_id("a"), element());

        trigger.pointer_enter();
        trigger.pointer_leave();
        drop(group);

        advance_ms(1000).await;
        assert_eq!(window.listener_count(), 0);
        assert!(!trigger.is_current());
    }

    #[tokio::test]
    async fn test_overlay_is_bound_to_group() {
        let window = HostWindow::new();
        let config = GroupConfig::default().with_open_delay(Duration::ZERO).with_id("nav");
        let group = TooltipGroup::mount(&window, config).unwrap();
        let trigger = group.trigger(Tooltip::with_id("home"), element());
        let mut overlay = group.overlay(
            Arc::new(OriginPlacement::default()),
            Arc::new(RecordingAnimator::default()),
        );

        trigger.pointer_enter();
        overlay.sync();
        let frame = overlay.frame().unwrap();
        assert_eq!(frame.group_id, "nav");
        assert_eq!(frame.tooltip_id, "home");

        window.dispatch(&HostEvent::Resize);
        overlay.sync();
        assert!(!overlay.is_open());
    }
}
