//! Command handlers - business logic for processing UI events

use std::fs;
use std::path::PathBuf;

use crate::app::AppState;
use crate::messages::ui_events::InputMode;
use crate::messages::NetworkCommand;
use crate::session::SessionAccessError;

impl AppState {
    // ========================
    // Session
    // ========================

    pub fn login(&self) -> Result<NetworkCommand, SessionAccessError> {
        Ok(self.use_session()?.login())
    }

    pub fn logout(&mut self) -> Result<(), SessionAccessError> {
        self.use_session_mut()?.logout();
        Ok(())
    }

    pub fn check_signer_status(&self) -> Result<Option<NetworkCommand>, SessionAccessError> {
        Ok(self.use_session()?.check_signer_status())
    }

    // ========================
    // Feed
    // ========================

    /// Fetch the livestream again; what is shown stays until the new data lands
    pub fn reload_feed(&self) -> NetworkCommand {
        self.feed.mount()
    }

    pub fn submit_reply(&mut self) -> Option<NetworkCommand> {
        self.feed.submit_reply()
    }

    pub fn scroll_up(&mut self) {
        self.replies_scroll = self.replies_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.replies_scroll = self.replies_scroll.saturating_add(1);
    }

    // ========================
    // Compose box
    // ========================

    pub fn start_editing(&mut self) {
        self.input_mode = InputMode::Editing;
        self.feed.cursor_end();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn enter_char(&mut self, c: char) {
        self.feed.insert_char(c);
    }

    pub fn delete_char(&mut self) {
        self.feed.delete_char();
    }

    pub fn move_cursor_left(&mut self) {
        self.feed.cursor_left();
    }

    pub fn move_cursor_right(&mut self) {
        self.feed.cursor_right();
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Attachment picker
    // ========================

    pub fn open_attachment_input(&mut self) {
        self.show_attachment_input = true;
    }

    pub fn attachment_path_char(&mut self, c: char) {
        self.attachment_path_input.push(c);
    }

    pub fn attachment_path_backspace(&mut self) {
        self.attachment_path_input.pop();
    }

    pub fn cancel_attachment_input(&mut self) {
        self.show_attachment_input = false;
        self.attachment_path_input.clear();
    }

    /// Hand the chosen file to the feed. Nothing is uploaded.
    pub fn select_attachment(&mut self) {
        let path = expand_home(&self.attachment_path_input);
        if path.is_file() {
            self.feed.select_attachment(&path);
        } else {
            tracing::debug!(path = %path.display(), "Attachment path is not a file");
        }
        self.cancel_attachment_input();
    }

    pub fn attachment_path_autocomplete(&mut self) {
        let input = expand_home(&self.attachment_path_input);
        let raw = input.to_string_lossy().to_string();

        if input.is_dir() && !raw.ends_with('/') {
            self.attachment_path_input = format!("{}/", raw);
            return;
        }

        let (parent, prefix) = if raw.ends_with('/') {
            (input.clone(), String::new())
        } else if let Some(parent) = input.parent() {
            let prefix = input
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            (parent.to_path_buf(), prefix)
        } else {
            return;
        };

        let Ok(entries) = fs::read_dir(&parent) else {
            return;
        };
        let mut matches: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| name.starts_with(&prefix) && !name.starts_with('.'))
            .collect();
        matches.sort();

        if let Some(common) = common_prefix(&matches) {
            if common.len() > prefix.len() {
                self.attachment_path_input = parent.join(common).to_string_lossy().to_string();
            }
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return PathBuf::from(format!("{}{}", home.to_string_lossy(), rest));
        }
    }
    PathBuf::from(path)
}

/// Longest shared prefix of `names`, on char boundaries
fn common_prefix(names: &[String]) -> Option<String> {
    let first = names.first()?;
    let mut len = first.len();
    for name in &names[1..] {
        len = first
            .char_indices()
            .zip(name.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map(|((i, a), _)| i + a.len_utf8())
            .unwrap_or(0)
            .min(len);
    }
    Some(first[..len].to_string())
}
