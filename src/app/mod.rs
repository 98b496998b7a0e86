//! App layer - central state management and command processing
//!
//! Owns the session manager and the feed view. UI events and network
//! responses go in; network commands and render snapshots come out.

pub mod state;
pub mod actor;
pub mod commands;

pub use state::{AppState, Applied};
pub use actor::AppActor;
