//! Host window event dispatch.
//!
//! A minimal event target standing in for the host UI's window: listeners
//! register for an event kind in the capture or bubble phase, and
//! [`HostWindow::dispatch`] runs every capture listener before any bubble
//! listener. Tooltip groups use it to dismiss on Escape, scroll and resize.

use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

/// Keys the dispatcher distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Character(char),
    Named(String),
}

/// An event delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    KeyDown(Key),
    Scroll,
    Resize,
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::KeyDown(_) => EventKind::KeyDown,
            Self::Scroll => EventKind::Scroll,
            Self::Resize => EventKind::Resize,
        }
    }
}

/// Event kinds a listener can register for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    Scroll,
    Resize,
}

/// When a listener runs relative to other listeners of the same event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerPhase {
    /// Runs before all bubble listeners.
    Capture,
    Bubble,
}

/// Handle returned by [`HostWindow::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

type Handler = Arc<dyn Fn(&HostEvent) + Send + Sync>;

struct Listener {
    id: ListenerId,
    kind: EventKind,
    phase: ListenerPhase,
    handler: Handler,
}

/// Shared listener registry for one host window.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct HostWindow {
    listeners: Arc<RwLock<Vec<Listener>>>,
}

impl HostWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners of the same phase run in registration order.
    pub fn add_listener<F>(&self, kind: EventKind, phase: ListenerPhase, handler: F) -> ListenerId
    where
        F: Fn(&HostEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(Uuid::new_v4());
        self.listeners.write().push(Listener { id, kind, phase, handler: Arc::new(handler) });
        tracing::trace!(listener_id = %id.0, ?kind, ?phase, "Listener added");
        id
    }

    /// Remove a listener. Unknown or already removed ids are ignored.
    ///
    /// Returns whether a listener was removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        let removed = listeners.len() != before;
        if removed {
            tracing::trace!(listener_id = %id.0, "Listener removed");
        }
        removed
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Deliver an event. Returns how many listeners ran.
    ///
    /// Handlers run without the registry locked, so they may add or remove
    /// listeners; such changes take effect from the next dispatch.
    pub fn dispatch(&self, event: &HostEvent) -> usize {
        let kind = event.kind();
        let handlers: Vec<Handler> = {
            let listeners = self.listeners.read();
            let capture = listeners
                .iter()
                .filter(|l| l.kind == kind && l.phase == ListenerPhase::Capture);
            let bubble =
                listeners.iter().filter(|l| l.kind == kind && l.phase == ListenerPhase::Bubble);
            capture.chain(bubble).map(|l| l.handler.clone()).collect()
        };

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_capture_runs_before_bubble() {
        let window = HostWindow::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let log = order.clone();
        window.add_listener(EventKind::KeyDown, ListenerPhase::Bubble, move |_| {
            log.lock().push("bubble")
        });
        let log = order.clone();
        window.add_listener(EventKind::KeyDown, ListenerPhase::Capture, move |_| {
            log.lock().push("capture")
        });

        assert_eq!(window.dispatch(&HostEvent::KeyDown(Key::Escape)), 2);
        assert_eq!(*order.lock(), vec!["capture", "bubble"]);
    }

    #[test]
    fn test_dispatch_filters_by_kind() {
        let window = HostWindow::new();
        window.add_listener(EventKind::Scroll, ListenerPhase::Capture, |_| {});

        assert_eq!(window.dispatch(&HostEvent::Resize), 0);
        assert_eq!(window.dispatch(&HostEvent::Scroll), 1);
    }

    #[test]
    fn test_remove_twice_is_silent() {
        let window = HostWindow::new();
        let id = window.add_listener(EventKind::Resize, ListenerPhase::Capture, |_| {});

        assert!(window.remove_listener(id));
        assert!(!window.remove_listener(id));
        assert_eq!(window.listener_count(), 0);
    }

    #[test]
    fn test_handler_may_remove_listeners() {
        let window = HostWindow::new();
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));

        let registry = window.clone();
        let own_id = slot.clone();
        let id = window.add_listener(EventKind::Scroll, ListenerPhase::Bubble, move |_| {
            if let Some(id) = own_id.lock().take() {
                registry.remove_listener(id);
            }
        });
        *slot.lock() = Some(id);

        assert_eq!(window.dispatch(&HostEvent::Scroll), 1);
        assert_eq!(window.dispatch(&HostEvent::Scroll), 0);
    }
}
