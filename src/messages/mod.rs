//! Messages passed between the UI, App and Network actors.
//!
//! Key presses become `UiEvent`s, API work travels as `NetworkCommand` /
//! `NetworkResponse`, and the UI draws from snapshots of `RenderState`.

pub mod ui_events;
pub mod network;
pub mod render;

pub use ui_events::UiEvent;
pub use network::{NetworkCommand, NetworkResponse};
pub use render::RenderState;
