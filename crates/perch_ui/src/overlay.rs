//! Shared tooltip overlay.
//!
//! Exactly one overlay exists per group and every trigger's tooltip is shown
//! through it. The overlay follows the coordinator's current tooltip but
//! keeps its own `rendered` copy: when the coordinator closes, the overlay
//! marks itself closed and keeps the last descriptor so the exit animation
//! can run in place. Only [`TooltipOverlay::on_animation_complete`] drops it.
//!
//! While mounted, including during the exit animation, the overlay holds an
//! [`AutoUpdate`] subscription from the placement engine and recomputes its
//! position whenever the engine reports a layout change.

use std::sync::Arc;

use perch_core::{
    Align, ContentPayload, CurrentTooltip, Side, Size, TooltipCoordinator, TooltipDescriptor,
};
use tokio::sync::watch;

use crate::motion::{AnimationRequest, Animator, Keyframe, Transition};
use crate::placement::{
    ArrowPosition, AutoUpdate, LayoutNotifier, PlacementEngine, PlacementRequest,
    ResolvedPosition,
};

/// Stacking order of the overlay.
pub const OVERLAY_Z_INDEX: u32 = 50;

/// `data-state` of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Open,
    Closed,
}

impl OverlayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Everything the host needs to draw the overlay this frame.
#[derive(Debug, Clone)]
pub struct OverlayFrame {
    pub group_id: String,
    pub layout_id: String,
    pub tooltip_id: String,
    pub state: OverlayState,
    /// Side after the placement engine's flips.
    pub side: Side,
    pub align: Align,
    pub x: f32,
    pub y: f32,
    pub z_index: u32,
    pub arrow: Option<ArrowPosition>,
    pub content: ContentPayload,
    pub content_as_child: bool,
}

impl OverlayFrame {
    /// Data attributes for the overlay's outer element.
    pub fn data_attributes(&self) -> [(&'static str, &'static str); 4] {
        [
            ("data-slot", "tooltip-overlay"),
            ("data-side", self.side.as_str()),
            ("data-align", self.align.as_str()),
            ("data-state", self.state.as_str()),
        ]
    }
}

#[derive(Debug, Default)]
struct Rendered {
    data: Option<Arc<TooltipDescriptor>>,
    open: bool,
}

struct LayoutWatch {
    notifier: LayoutNotifier,
    _subscription: AutoUpdate,
}

enum Wake {
    Tooltip { alive: bool },
    Layout,
}

/// Renderer for a group's single overlay element.
pub struct TooltipOverlay {
    coordinator: TooltipCoordinator,
    receiver: watch::Receiver<CurrentTooltip>,
    placement: Arc<dyn PlacementEngine>,
    animator: Arc<dyn Animator>,
    transition: Transition,
    layout_id: String,
    rendered: Rendered,
    position: Option<ResolvedPosition>,
    floating_size: Option<Size>,
    arrow_size: Option<Size>,
    // Last keyframe handed to the animator
    target: Option<Keyframe>,
    layout: Option<LayoutWatch>,
}

impl TooltipOverlay {
    /// Create the overlay and pick up whatever the coordinator currently shows.
    pub fn new(
        coordinator: TooltipCoordinator,
        placement: Arc<dyn PlacementEngine>,
        animator: Arc<dyn Animator>,
    ) -> Self {
        let mut receiver = coordinator.subscribe();
        let current = receiver.borrow_and_update().clone();
        let layout_id = format!("tooltip-overlay-{}", coordinator.group_id());

        let mut overlay = Self {
            coordinator,
            receiver,
            placement,
            animator,
            transition: Transition::default(),
            layout_id,
            rendered: Rendered::default(),
            position: None,
            floating_size: None,
            arrow_size: None,
            target: None,
            layout: None,
        };
        overlay.apply(current);
        overlay
    }

    /// Override the default spring transition.
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    // ========== Following the coordinator ==========

    /// Apply the latest coordinator value and any reported layout change.
    ///
    /// Returns whether anything was applied.
    pub fn sync(&mut self) -> bool {
        let mut applied = false;
        if let Ok(true) = self.receiver.has_changed() {
            let current = self.receiver.borrow_and_update().clone();
            self.apply(current);
            applied = true;
        }
        self.take_layout_change() || applied
    }

    /// Wait for the next coordinator change or layout change and apply it.
    ///
    /// Returns false once the coordinator is gone.
    pub async fn changed(&mut self) -> bool {
        loop {
            let notifier = self.layout.as_ref().map(|watch| watch.notifier.clone());
            let wake = tokio::select! {
                result = self.receiver.changed() => Wake::Tooltip { alive: result.is_ok() },
                _ = wait_for_layout(notifier.as_ref()) => Wake::Layout,
            };

            match wake {
                Wake::Tooltip { alive: false } => return false,
                Wake::Tooltip { alive: true } => {
                    let current = self.receiver.borrow_and_update().clone();
                    self.apply(current);
                    return true;
                }
                Wake::Layout => {
                    if self.take_layout_change() {
                        return true;
                    }
                }
            }
        }
    }

    fn take_layout_change(&mut self) -> bool {
        let changed = self.layout.as_ref().is_some_and(|watch| watch.notifier.take());
        if changed {
            self.reposition();
        }
        changed
    }

    fn watch_layout(&mut self) {
        let notifier = LayoutNotifier::default();
        let subscription =
            self.placement.auto_update(self.coordinator.reference_element(), notifier.clone());
        self.layout = Some(LayoutWatch { notifier, _subscription: subscription });
    }

    fn apply(&mut self, current: CurrentTooltip) {
        match current {
            Some(descriptor) => {
                let mounting = self.rendered.data.is_none();
                let side = descriptor.side;
                tracing::trace!(
                    tooltip_id = %descriptor.id,
                    mounting,
                    "Overlay showing tooltip"
                );
                self.rendered = Rendered { data: Some(descriptor), open: true };
                self.watch_layout();
                self.reposition();
                if mounting {
                    self.animate(Keyframe::hidden(side), Keyframe::SHOWN);
                } else {
                    self.animate_to(Keyframe::SHOWN);
                }
            }
            None => {
                if let Some(descriptor) = &self.rendered.data {
                    if self.rendered.open {
                        let side = descriptor.side;
                        self.rendered.open = false;
                        tracing::trace!(tooltip_id = %descriptor.id, "Overlay closing");
                        self.animate_to(Keyframe::hidden(side));
                    }
                }
            }
        }
    }

    // ========== Host callbacks ==========

    /// The animator finished its last instruction.
    ///
    /// After an exit animation this unmounts the overlay.
    pub fn on_animation_complete(&mut self) {
        if self.rendered.open || self.rendered.data.is_none() {
            return;
        }
        if let Some(descriptor) = self.rendered.data.take() {
            tracing::trace!(tooltip_id = %descriptor.id, "Overlay unmounted");
        }
        self.position = None;
        self.target = None;
        self.layout = None;
    }

    /// Open or close the overlay locally without touching the coordinator.
    pub fn set_open(&mut self, open: bool) {
        let Some(side) = self.rendered.data.as_ref().map(|d| d.side) else {
            return;
        };
        if self.rendered.open == open {
            return;
        }
        self.rendered.open = open;
        if open {
            self.animate_to(Keyframe::SHOWN);
        } else {
            self.animate_to(Keyframe::hidden(side));
        }
    }

    /// Recompute the position, e.g. after scroll, resize, or a content change.
    pub fn reposition(&mut self) {
        let Some(descriptor) = self.rendered.data.as_ref() else {
            self.position = None;
            return;
        };

        let reference = self
            .coordinator
            .reference_element()
            .map(|element| element.bounding_rect())
            .unwrap_or(descriptor.anchor_rect);
        let mut request = PlacementRequest::for_descriptor(descriptor, reference);
        request.floating_size = self.floating_size;
        request.arrow_size = self.arrow_size;

        self.position = self.placement.compute(&request);
        if self.position.is_none() {
            tracing::trace!(tooltip_id = %descriptor.id, "Overlay position not resolved yet");
        }
    }

    /// Report the measured size of the overlay element.
    pub fn set_floating_size(&mut self, size: Size) {
        self.floating_size = Some(size);
        self.reposition();
    }

    /// Report the measured size of the arrow element.
    pub fn set_arrow_size(&mut self, size: Size) {
        self.arrow_size = Some(size);
        self.reposition();
    }

    // ========== Reads ==========

    /// The frame to draw, or `None` when nothing is mounted or not yet positioned.
    pub fn frame(&self) -> Option<OverlayFrame> {
        let descriptor = self.rendered.data.as_ref()?;
        let position = self.position?;

        Some(OverlayFrame {
            group_id: self.coordinator.group_id().to_string(),
            layout_id: self.layout_id.clone(),
            tooltip_id: descriptor.id.clone(),
            state: if self.rendered.open { OverlayState::Open } else { OverlayState::Closed },
            side: position.placement.resolved_side(),
            align: descriptor.align,
            x: position.x,
            y: position.y,
            z_index: OVERLAY_Z_INDEX,
            arrow: position.arrow,
            content: descriptor.content.clone(),
            content_as_child: descriptor.content_as_child,
        })
    }

    pub fn is_open(&self) -> bool {
        self.rendered.open
    }

    /// Whether a descriptor is held, including during the exit animation.
    pub fn is_mounted(&self) -> bool {
        self.rendered.data.is_some()
    }

    pub fn rendered_tooltip(&self) -> Option<&Arc<TooltipDescriptor>> {
        self.rendered.data.as_ref()
    }

    pub fn layout_id(&self) -> &str {
        &self.layout_id
    }

    fn animate_to(&mut self, to: Keyframe) {
        if self.target == Some(to) {
            return;
        }
        let from = self.target.unwrap_or(to);
        self.animate(from, to);
    }

    fn animate(&mut self, from: Keyframe, to: Keyframe) {
        self.target = Some(to);
        self.animator.animate(AnimationRequest {
            layout_id: self.layout_id.clone(),
            from,
            to,
            transition: self.transition,
        });
    }
}

async fn wait_for_layout(notifier: Option<&LayoutNotifier>) {
    match notifier {
        Some(notifier) => notifier.notified().await,
        None => std::future::pending().await,
    }
}
