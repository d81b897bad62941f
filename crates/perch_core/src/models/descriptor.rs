//! Tooltip descriptors and the opaque content they carry.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::geometry::{Align, Placement, Rect, Side};

/// A host element a tooltip can anchor to.
///
/// The coordinator only keeps a weak back-reference; the host owns the element.
pub trait AnchorElement: Send + Sync {
    /// Current bounding box of the element in viewport pixels.
    fn bounding_rect(&self) -> Rect;
}

/// Type-erased content for the overlay to render.
///
/// Coordination code moves it around without looking inside. Only the
/// rendering boundary calls [`ContentPayload::downcast_ref`].
#[derive(Clone)]
pub struct ContentPayload(Arc<dyn Any + Send + Sync>);

impl ContentPayload {
    pub fn new<T: Any + Send + Sync>(content: T) -> Self {
        Self(Arc::new(content))
    }

    /// An empty payload for tooltips whose content has not been set yet.
    pub fn empty() -> Self {
        Self(Arc::new(()))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether both payloads point at the same content.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for ContentPayload {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ContentPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContentPayload(..)")
    }
}

/// Snapshot of what to show and where, built by a trigger on open intent.
#[derive(Debug, Clone)]
pub struct TooltipDescriptor {
    /// Identity of the owning trigger, unique within its group.
    pub id: String,
    /// Trigger bounds at the moment the open intent happened.
    pub anchor_rect: Rect,
    pub side: Side,
    pub align: Align,
    pub side_offset: f32,
    pub align_offset: f32,
    pub content: ContentPayload,
    /// Content replaces the default wrapper instead of being wrapped by it.
    pub content_as_child: bool,
}

impl TooltipDescriptor {
    /// Create a descriptor with default placement and offsets.
    pub fn new(id: impl Into<String>, anchor_rect: Rect) -> Self {
        Self {
            id: id.into(),
            anchor_rect,
            side: Side::default(),
            align: Align::default(),
            side_offset: 6.0,
            align_offset: 0.0,
            content: ContentPayload::empty(),
            content_as_child: false,
        }
    }

    pub fn placement(&self) -> Placement {
        Placement::new(self.side, self.align)
    }

    pub fn with_content(mut self, content: ContentPayload) -> Self {
        self.content = content;
        self
    }

    pub fn with_placement(mut self, side: Side, align: Align) -> Self {
        self.side = side;
        self.align = align;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_opaque_until_downcast() {
        let payload = ContentPayload::new(String::from("Save"));
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("Save"));
        assert!(payload.downcast_ref::<u32>().is_none());
        assert_eq!(format!("{payload:?}"), "ContentPayload(..)");
    }

    #[test]
    fn test_payload_clone_shares_content() {
        let payload = ContentPayload::new(42u32);
        let clone = payload.clone();
        assert!(payload.ptr_eq(&clone));
        assert!(!payload.ptr_eq(&ContentPayload::new(42u32)));
    }

    #[test]
    fn test_descriptor_defaults() {
        let descriptor = TooltipDescriptor::new("a", Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(descriptor.placement().to_string(), "top");
        assert_eq!(descriptor.side_offset, 6.0);
        assert!(!descriptor.content_as_child);
    }
}
