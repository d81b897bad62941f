//! Data models for Perch.
//!
//! - `geometry` - Rect, Size, Side, Align, Placement
//! - `descriptor` - TooltipDescriptor, ContentPayload, AnchorElement

pub mod descriptor;
pub mod geometry;

pub use descriptor::{AnchorElement, ContentPayload, TooltipDescriptor};
pub use geometry::{Align, Placement, Rect, Side, Size};
