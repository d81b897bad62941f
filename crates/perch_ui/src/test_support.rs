//! Fakes for the host collaborators used across perch_ui tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use perch_core::{AnchorElement, Rect};

use crate::motion::{AnimationRequest, Animator};
use crate::placement::{
    ArrowPosition, AutoUpdate, LayoutNotifier, PlacementEngine, PlacementRequest,
    ResolvedPosition,
};

/// Element whose bounds tests can move.
pub struct FakeElement {
    rect: Mutex<Rect>,
}

impl FakeElement {
    pub fn new(rect: Rect) -> Arc<Self> {
        Arc::new(Self { rect: Mutex::new(rect) })
    }

    pub fn move_to(&self, rect: Rect) {
        *self.rect.lock() = rect;
    }
}

impl AnchorElement for FakeElement {
    fn bounding_rect(&self) -> Rect {
        *self.rect.lock()
    }
}

/// Places the overlay at the reference origin plus the side offset, never flipping.
#[derive(Default)]
pub struct OriginPlacement {
    pub requests: Mutex<Vec<PlacementRequest>>,
    notifiers: Mutex<Vec<LayoutNotifier>>,
    active: Arc<AtomicUsize>,
}

impl OriginPlacement {
    /// Simulate a scroll, resize or content reflow.
    pub fn layout_changed(&self) {
        for notifier in self.notifiers.lock().iter() {
            notifier.notify();
        }
    }

    /// Auto-update subscriptions not yet dropped.
    pub fn active_watches(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl PlacementEngine for OriginPlacement {
    fn compute(&self, request: &PlacementRequest) -> Option<ResolvedPosition> {
        self.requests.lock().push(*request);
        Some(ResolvedPosition {
            x: request.reference.x,
            y: request.reference.y - request.main_axis_offset,
            placement: request.placement,
            arrow: Some(ArrowPosition { x: Some(request.reference.width / 2.0), y: None }),
        })
    }

    fn auto_update(
        &self,
        _reference: Option<Arc<dyn AnchorElement>>,
        notifier: LayoutNotifier,
    ) -> AutoUpdate {
        self.notifiers.lock().push(notifier);
        self.active.fetch_add(1, Ordering::SeqCst);
        let active = self.active.clone();
        AutoUpdate::new(move || {
            active.fetch_sub(1, Ordering::SeqCst);
        })
    }
}

/// Never resolves, as if the floating element were not measured yet.
pub struct UnresolvedPlacement;

impl PlacementEngine for UnresolvedPlacement {
    fn compute(&self, _request: &PlacementRequest) -> Option<ResolvedPosition> {
        None
    }
}

/// Records every animation instruction.
#[derive(Default)]
pub struct RecordingAnimator {
    pub requests: Mutex<Vec<AnimationRequest>>,
}

impl RecordingAnimator {
    pub fn count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last(&self) -> Option<AnimationRequest> {
        self.requests.lock().last().cloned()
    }
}

impl Animator for RecordingAnimator {
    fn animate(&self, request: AnimationRequest) {
        self.requests.lock().push(request);
    }
}

pub async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    tokio::task::yield_now().await;
}
