//! Per-tooltip configuration and content.
//!
//! A [`Tooltip`] holds what one trigger will ask the group to show: its
//! placement preferences, offsets, and the content set by its content slot.

use std::sync::Arc;

use parking_lot::RwLock;
use perch_core::{Align, ContentPayload, Rect, Side, TooltipDescriptor};
use uuid::Uuid;

/// Default gap between trigger and tooltip along the side axis.
pub const DEFAULT_SIDE_OFFSET: f32 = 6.0;

#[derive(Debug, Default)]
struct ContentSlot {
    payload: ContentPayload,
    as_child: bool,
}

/// Configuration for a single tooltip.
///
/// Cloning shares the content slot, so content set through one clone is
/// seen by every trigger built from the tooltip.
#[derive(Debug, Clone)]
pub struct Tooltip {
    id: String,
    side: Side,
    align: Align,
    side_offset: f32,
    align_offset: f32,
    content: Arc<RwLock<ContentSlot>>,
}

impl Tooltip {
    /// Create a tooltip with a fresh id and default placement (`top`, centered).
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// Create a tooltip with an explicit id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            side: Side::default(),
            align: Align::default(),
            side_offset: DEFAULT_SIDE_OFFSET,
            align_offset: 0.0,
            content: Arc::new(RwLock::new(ContentSlot::default())),
        }
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn side_offset(mut self, offset: f32) -> Self {
        self.side_offset = offset;
        self
    }

    pub fn align_offset(mut self, offset: f32) -> Self {
        self.align_offset = offset;
        self
    }

    /// Set the initial content.
    pub fn content(self, payload: ContentPayload) -> Self {
        self.set_content(payload, false);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Replace the content. `as_child` makes the content replace the overlay's wrapper.
    ///
    /// Takes effect on the next open; an already shown descriptor keeps its snapshot.
    pub fn set_content(&self, payload: ContentPayload, as_child: bool) {
        let mut slot = self.content.write();
        slot.payload = payload;
        slot.as_child = as_child;
    }

    /// Snapshot this tooltip into a descriptor anchored at `anchor_rect`.
    pub fn descriptor(&self, anchor_rect: Rect) -> TooltipDescriptor {
        let slot = self.content.read();
        let mut descriptor = TooltipDescriptor::new(self.id.clone(), anchor_rect)
            .with_placement(self.side, self.align)
            .with_content(slot.payload.clone());
        descriptor.side_offset = self.side_offset;
        descriptor.align_offset = self.align_offset;
        descriptor.content_as_child = slot.as_child;
        descriptor
    }
}

impl Default for Tooltip {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tooltip_defaults() {
        let tooltip = Tooltip::new();
        let descriptor = tooltip.descriptor(Rect::default());
        assert_eq!(descriptor.side, Side::Top);
        assert_eq!(descriptor.align, Align::Center);
        assert_eq!(descriptor.side_offset, DEFAULT_SIDE_OFFSET);
        assert_eq!(descriptor.align_offset, 0.0);
        assert!(!descriptor.content_as_child);
        assert_eq!(descriptor.id, tooltip.id());
    }

    #[test]
    fn test_tooltip_ids_are_unique() {
        assert_ne!(Tooltip::new().id(), Tooltip::new().id());
    }

    #[test]
    fn test_descriptor_snapshots_configuration() {
        let tooltip = Tooltip::with_id("save")
            .side(Side::Right)
            .align(Align::Start)
            .side_offset(10.0)
            .align_offset(-4.0)
            .content(ContentPayload::new("Save file"));

        let rect = Rect::new(5.0, 6.0, 7.0, 8.0);
        let descriptor = tooltip.descriptor(rect);
        assert_eq!(descriptor.anchor_rect, rect);
        assert_eq!(descriptor.placement().to_string(), "right-start");
        assert_eq!(descriptor.side_offset, 10.0);
        assert_eq!(descriptor.align_offset, -4.0);
        assert_eq!(descriptor.content.downcast_ref::<&str>(), Some(&"Save file"));
    }

    #[test]
    fn test_clones_share_content() {
        let tooltip = Tooltip::with_id("t");
        let clone = tooltip.clone();
        clone.set_content(ContentPayload::new(7u8), true);

        let descriptor = tooltip.descriptor(Rect::default());
        assert_eq!(descriptor.content.downcast_ref::<u8>(), Some(&7));
        assert!(descriptor.content_as_child);
    }
}
