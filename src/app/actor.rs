//! App actor - message loop processing UI events and network responses

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::app::state::AppState;
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use crate::session::SessionAccessError;

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
    poll_interval: Duration,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
        poll_interval: Duration,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
            poll_interval,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) -> Result<(), SessionAccessError> {
        // Mount the feed
        self.send(self.state.feed.mount());
        self.render()?;

        let mut poll = tokio::time::interval(self.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                event = ui_rx.recv() => {
                    // UI loop gone without a Quit
                    let Some(event) = event else {
                        self.send(NetworkCommand::Shutdown);
                        break;
                    };
                    if self.handle_ui_event(event)? {
                        // Quit signal received
                        self.send(NetworkCommand::Shutdown);
                        break;
                    }
                    self.render()?;
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response, Utc::now())?;
                    self.render()?;
                }
                _ = poll.tick() => {
                    // Only issues a request while a signer is pending
                    if let Some(cmd) = self.state.check_signer_status()? {
                        self.send(cmd);
                    }
                }
            }
        }
        Ok(())
    }

    fn send(&self, cmd: NetworkCommand) {
        let _ = self.network_tx.send(cmd);
    }

    fn render(&self) -> Result<(), SessionAccessError> {
        let _ = self.render_tx.send(self.state.to_render_state()?);
        Ok(())
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> Result<bool, SessionAccessError> {
        // Only the spinner is drawn while loading
        if self.state.feed.is_loading() && event.needs_feed() {
            tracing::debug!(?event, "Ignored while the feed is loading");
            return Ok(false);
        }

        match event {
            // Reply list
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),
            UiEvent::ReloadFeed => {
                let cmd = self.state.reload_feed();
                self.send(cmd);
            }

            // Compose box
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::SubmitReply => {
                if self.state.input_mode == InputMode::Editing {
                    self.state.stop_editing();
                }
                if let Some(cmd) = self.state.submit_reply() {
                    self.send(cmd);
                }
            }

            // Session
            UiEvent::Login => {
                let cmd = self.state.login()?;
                self.send(cmd);
            }
            UiEvent::Logout => self.state.logout()?,
            UiEvent::CheckSignerStatus => {
                if let Some(cmd) = self.state.check_signer_status()? {
                    self.send(cmd);
                }
            }

            // Attachment picker
            UiEvent::OpenAttachmentInput => self.state.open_attachment_input(),
            UiEvent::AttachmentPathChar(c) => self.state.attachment_path_char(c),
            UiEvent::AttachmentPathBackspace => self.state.attachment_path_backspace(),
            UiEvent::AttachmentPathAutocomplete => self.state.attachment_path_autocomplete(),
            UiEvent::SelectAttachment => self.state.select_attachment(),
            UiEvent::CancelAttachmentInput => self.state.cancel_attachment_input(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return Ok(true),
        }

        Ok(false)
    }
}
