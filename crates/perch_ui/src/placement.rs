//! Contract with the floating placement engine.
//!
//! Perch does not position anything itself. The overlay describes what it
//! wants through a [`PlacementRequest`] and a host-provided
//! [`PlacementEngine`] answers with a [`ResolvedPosition`], flipping or
//! shifting as it sees fit. While the overlay is mounted the engine may
//! also watch the layout and tell the overlay to recompute through a
//! [`LayoutNotifier`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use perch_core::{AnchorElement, Placement, Rect, Size, TooltipDescriptor};
use tokio::sync::Notify;

/// Minimum distance kept between the floating element and the viewport edge.
pub const SHIFT_PADDING: f32 = 8.0;

/// Everything the engine needs to place the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    /// Bounds of the reference element.
    pub reference: Rect,
    /// Preferred placement; the engine may flip it.
    pub placement: Placement,
    /// Gap along the side axis.
    pub main_axis_offset: f32,
    /// Shift along the alignment axis.
    pub cross_axis_offset: f32,
    pub shift_padding: f32,
    /// Measured size of the floating element, once known.
    pub floating_size: Option<Size>,
    pub arrow_size: Option<Size>,
}

impl PlacementRequest {
    /// Build a request for `descriptor` against the given reference bounds.
    pub fn for_descriptor(descriptor: &TooltipDescriptor, reference: Rect) -> Self {
        Self {
            reference,
            placement: descriptor.placement(),
            main_axis_offset: descriptor.side_offset,
            cross_axis_offset: descriptor.align_offset,
            shift_padding: SHIFT_PADDING,
            floating_size: None,
            arrow_size: None,
        }
    }
}

/// Arrow offset inside the floating element. `None` on the axis the arrow does not slide along.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArrowPosition {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

/// Where the engine put the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPosition {
    pub x: f32,
    pub y: f32,
    /// Final placement after any flip.
    pub placement: Placement,
    pub arrow: Option<ArrowPosition>,
}

/// Handle an engine uses to ask the overlay for a new position.
#[derive(Debug, Clone, Default)]
pub struct LayoutNotifier {
    signal: Arc<LayoutSignal>,
}

#[derive(Debug, Default)]
struct LayoutSignal {
    dirty: AtomicBool,
    wake: Notify,
}

impl LayoutNotifier {
    /// Something the overlay is positioned against moved or resized.
    pub fn notify(&self) {
        self.signal.dirty.store(true, Ordering::SeqCst);
        self.signal.wake.notify_one();
    }

    /// Consume a pending notification.
    pub(crate) fn take(&self) -> bool {
        self.signal.dirty.swap(false, Ordering::SeqCst)
    }

    pub(crate) async fn notified(&self) {
        self.signal.wake.notified().await;
    }
}

/// Subscription returned by [`PlacementEngine::auto_update`]. Dropping it stops the updates.
pub struct AutoUpdate {
    cleanup: Option<Box<dyn FnOnce() + Send>>,
}

impl AutoUpdate {
    pub fn new(cleanup: impl FnOnce() + Send + 'static) -> Self {
        Self { cleanup: Some(Box::new(cleanup)) }
    }

    /// A subscription with nothing to clean up.
    pub fn none() -> Self {
        Self { cleanup: None }
    }
}

impl Drop for AutoUpdate {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl std::fmt::Debug for AutoUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoUpdate").field("active", &self.cleanup.is_some()).finish()
    }
}

/// External geometry engine.
pub trait PlacementEngine: Send + Sync {
    /// Resolve a position, or `None` while the floating element cannot be placed yet.
    fn compute(&self, request: &PlacementRequest) -> Option<ResolvedPosition>;

    /// Watch scroll, resize and size changes affecting `reference` while the overlay is mounted.
    ///
    /// Call `notifier.notify()` whenever the overlay should recompute. Engines
    /// without layout observation keep the default, and the host calls
    /// [`TooltipOverlay::reposition`](crate::TooltipOverlay::reposition) instead.
    fn auto_update(
        &self,
        reference: Option<Arc<dyn AnchorElement>>,
        notifier: LayoutNotifier,
    ) -> AutoUpdate {
        let _ = (reference, notifier);
        AutoUpdate::none()
    }
}
