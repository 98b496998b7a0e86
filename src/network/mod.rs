//! Network layer - calls against the vibra API
//!
//! The Network actor receives API commands and sends back responses.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::{ApiClient, ApiError, LivestreamApi};
