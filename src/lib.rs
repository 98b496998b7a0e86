//! # vibra TUI
//!
//! A terminal companion for vibra livestreams.
//!
//! ## Features
//! - Livestream info: streamer, channel, engagement
//! - Reply feed, newest first, with a participant list
//! - Casting replies to the livestream
//! - Farcaster sign-in through a delegated signer, polled until approved
//! - Session kept across restarts
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod config;
pub mod constants;
pub mod models;
pub mod storage;
pub mod session;
pub mod feed;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use config::Config;
pub use models::{Author, LivestreamSnapshot, Reply, Session, SignerStatus};
pub use session::{SessionAccessError, SessionManager, SessionUpdate};
pub use feed::{FeedUpdate, FeedView, ReplyList};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::{ApiClient, LivestreamApi, NetworkActor};
