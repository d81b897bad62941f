//! Coordination services for Perch.
//!
//! - `timer` - DelayTimer, the single-slot cancelable deferred callback
//! - `coordinator` - TooltipCoordinator, the per-group open/close state machine
//! - `window` - HostWindow, capture/bubble event dispatch for global dismiss listeners

pub mod coordinator;
pub mod timer;
pub mod window;

pub use coordinator::{CurrentTooltip, TooltipCoordinator, TooltipPhase};
pub use timer::{DelayTimer, TimerId};
pub use window::{EventKind, HostEvent, HostWindow, Key, ListenerId, ListenerPhase};
