//! Tooltip group components built on perch_core.
//!
//! - [`TooltipGroup`]: mounts a coordinator and its global dismiss listeners
//! - [`TooltipTrigger`]: adapts pointer and focus events on one host element
//! - [`TooltipOverlay`]: the single shared overlay, positioned and animated
//!   through the host's [`PlacementEngine`] and [`Animator`]

pub mod group;
pub mod motion;
pub mod overlay;
pub mod placement;
pub mod tooltip;
pub mod trigger;

#[cfg(test)]
mod test_support;

pub use group::TooltipGroup;
pub use motion::{AnimationRequest, Animator, Keyframe, Transition};
pub use overlay::{OverlayFrame, OverlayState, TooltipOverlay};
pub use placement::{
    ArrowPosition, AutoUpdate, LayoutNotifier, PlacementEngine, PlacementRequest,
    ResolvedPosition,
};
pub use tooltip::Tooltip;
pub use trigger::TooltipTrigger;
