//! App state - pure data structure with no I/O logic

use chrono::{DateTime, Utc};

use crate::feed::{FeedUpdate, FeedView};
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkResponse, RenderState};
use crate::session::{SessionAccessError, SessionManager, SessionUpdate};

/// Result of feeding one network response into the state
#[derive(Clone, Debug, PartialEq)]
pub enum Applied {
    Session(SessionUpdate),
    Feed(FeedUpdate),
}

/// Main application state - pure data, no I/O
pub struct AppState {
    /// Installed by the session provider; see [`AppState::use_session`]
    session: Option<SessionManager>,
    pub feed: FeedView,

    // UI state
    pub input_mode: InputMode,
    pub replies_scroll: u16,

    // Popups
    pub show_help: bool,
    pub show_attachment_input: bool,
    pub attachment_path_input: String,
}

impl AppState {
    /// State with `session` provided to everything below it
    pub fn new(session: SessionManager) -> Self {
        AppState {
            session: Some(session),
            ..Self::without_session()
        }
    }

    /// State with no session provider; session access fails
    pub fn without_session() -> Self {
        AppState {
            session: None,
            feed: FeedView::new(),
            input_mode: InputMode::Normal,
            replies_scroll: 0,
            show_help: false,
            show_attachment_input: false,
            attachment_path_input: String::new(),
        }
    }

    /// The one way to reach session state
    pub fn use_session(&self) -> Result<&SessionManager, SessionAccessError> {
        self.session.as_ref().ok_or(SessionAccessError::NoProvider)
    }

    pub fn use_session_mut(&mut self) -> Result<&mut SessionManager, SessionAccessError> {
        self.session.as_mut().ok_or(SessionAccessError::NoProvider)
    }

    /// Apply a network response
    pub fn handle_response(
        &mut self,
        response: NetworkResponse,
        now: DateTime<Utc>,
    ) -> Result<Applied, SessionAccessError> {
        let applied = match response {
            NetworkResponse::LoggedIn(result) => {
                Applied::Session(self.use_session_mut()?.apply_login(result))
            }
            NetworkResponse::SignerStatus(result) => {
                Applied::Session(self.use_session_mut()?.apply_signer_status(result))
            }
            NetworkResponse::Feed(result) => {
                let update = self.feed.apply_feed(result);
                if update == FeedUpdate::Loaded {
                    self.replies_scroll = 0;
                }
                Applied::Feed(update)
            }
            NetworkResponse::ReplySubmitted { text, result } => {
                Applied::Feed(self.feed.apply_reply(&text, result, now))
            }
        };
        Ok(applied)
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> Result<RenderState, SessionAccessError> {
        let session = self.use_session()?.current().cloned();
        Ok(RenderState {
            session,
            livestream: self.feed.snapshot().cloned(),
            replies: self.feed.replies.sorted_by_recency().into_iter().cloned().collect(),
            participants: self.feed.replies.participants().into_iter().cloned().collect(),
            replies_scroll: self.replies_scroll,
            draft: self.feed.draft.clone(),
            cursor_position: self.feed.cursor,
            is_submitting: self.feed.is_submitting(),
            input_mode: self.input_mode,
            show_help: self.show_help,
            show_attachment_input: self.show_attachment_input,
            attachment_path_input: self.attachment_path_input.clone(),
        })
    }
}
