//! Core types and services for Perch tooltip groups.
//!
//! This crate provides the host-agnostic coordination layer:
//!
//! - **models**: Descriptors, geometry, and the opaque content payload
//! - **services**: Delay timer, group coordinator, host event dispatch
//! - **config**: Per-group timing configuration
//! - **error**: Error handling for the ambient edges
//! - **logging**: Structured logging setup

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;


pub use config::GroupConfig;
pub use error::PerchError;
pub use models::{
    Align, AnchorElement, ContentPayload, Placement, Rect, Side, Size, TooltipDescriptor,
};
pub use services::{
    CurrentTooltip, DelayTimer, EventKind, HostEvent, HostWindow, Key, ListenerId, ListenerPhase,
    TimerId, TooltipCoordinator, TooltipPhase,
};
