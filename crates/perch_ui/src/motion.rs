//! Enter and exit motion for the shared overlay.
//!
//! The overlay only decides which keyframe it is heading to; easing and
//! physics belong to the host's [`Animator`].

use perch_core::Side;

/// How far the overlay slides toward the trigger while appearing.
pub const SLIDE_DISTANCE: f32 = 15.0;

/// Visual state the overlay animates between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub opacity: f32,
    pub scale: f32,
    pub x: f32,
    pub y: f32,
}

impl Keyframe {
    /// Fully visible and in place.
    pub const SHOWN: Keyframe = Keyframe { opacity: 1.0, scale: 1.0, x: 0.0, y: 0.0 };

    /// Invisible, collapsed, and pushed away from the trigger on `side`.
    pub fn hidden(side: Side) -> Self {
        let (x, y) = initial_from_side(side);
        Self { opacity: 0.0, scale: 0.0, x, y }
    }
}

/// Starting offset for an overlay placed on `side` of its trigger.
pub fn initial_from_side(side: Side) -> (f32, f32) {
    match side {
        Side::Top => (0.0, SLIDE_DISTANCE),
        Side::Bottom => (0.0, -SLIDE_DISTANCE),
        Side::Left => (SLIDE_DISTANCE, 0.0),
        Side::Right => (-SLIDE_DISTANCE, 0.0),
    }
}

/// Transition handed to the animator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Spring { stiffness: f32, damping: f32 },
    Tween { duration_ms: u64 },
}

impl Default for Transition {
    fn default() -> Self {
        Self::Spring { stiffness: 300.0, damping: 25.0 }
    }
}

/// One "animate from A to B" instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRequest {
    /// Shared across every tooltip of a group so the host can morph between them.
    pub layout_id: String,
    pub from: Keyframe,
    pub to: Keyframe,
    pub transition: Transition,
}

/// External animation engine.
///
/// The host reports completion by calling
/// [`TooltipOverlay::on_animation_complete`](crate::TooltipOverlay::on_animation_complete).
pub trait Animator: Send + Sync {
    fn animate(&self, request: AnimationRequest);
}
