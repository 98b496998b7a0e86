//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::InputMode;
use crate::models::{Author, LivestreamSnapshot, Reply, Session};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Session
    pub session: Option<Session>,

    // Feed; `None` while the livestream has not loaded
    pub livestream: Option<LivestreamSnapshot>,
    /// Newest first
    pub replies: Vec<Reply>,
    pub participants: Vec<Author>,
    pub replies_scroll: u16,

    // Compose box
    pub draft: String,
    pub cursor_position: usize,
    pub is_submitting: bool,
    pub input_mode: InputMode,

    // Popups
    pub show_help: bool,
    pub show_attachment_input: bool,
    pub attachment_path_input: String,
}

impl RenderState {
    pub fn is_loading(&self) -> bool {
        self.livestream.is_none()
    }
}
