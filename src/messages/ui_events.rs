//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Reply list
    ScrollUp,
    ScrollDown,
    ReloadFeed,

    // Compose box
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    SubmitReply,

    // Session
    Login,
    Logout,
    CheckSignerStatus,

    // Attachment picker
    OpenAttachmentInput,
    AttachmentPathChar(char),
    AttachmentPathBackspace,
    AttachmentPathAutocomplete,
    SelectAttachment,
    CancelAttachmentInput,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

impl UiEvent {
    /// Events that act on widgets only drawn once the feed has loaded
    pub fn needs_feed(&self) -> bool {
        matches!(
            self,
            UiEvent::StartEditing
                | UiEvent::StopEditing
                | UiEvent::CharInput(_)
                | UiEvent::Backspace
                | UiEvent::CursorLeft
                | UiEvent::CursorRight
                | UiEvent::SubmitReply
                | UiEvent::OpenAttachmentInput
                | UiEvent::AttachmentPathChar(_)
                | UiEvent::AttachmentPathBackspace
                | UiEvent::AttachmentPathAutocomplete
                | UiEvent::SelectAttachment
                | UiEvent::CancelAttachmentInput
                | UiEvent::ToggleHelp
                | UiEvent::CloseHelp
        )
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    input_mode: InputMode,
    show_help: bool,
    show_attachment_input: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    if show_attachment_input {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::CancelAttachmentInput),
            KeyCode::Enter => Some(UiEvent::SelectAttachment),
            KeyCode::Tab => Some(UiEvent::AttachmentPathAutocomplete),
            KeyCode::Backspace => Some(UiEvent::AttachmentPathBackspace),
            KeyCode::Char(c) => Some(UiEvent::AttachmentPathChar(c)),
            _ => None,
        };
    }

    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('e') | KeyCode::Char('i') => Some(UiEvent::StartEditing),
            KeyCode::Char('s') => Some(UiEvent::SubmitReply),
            KeyCode::Char('l') => Some(UiEvent::Login),
            KeyCode::Char('o') => Some(UiEvent::Logout),
            KeyCode::Char('p') => Some(UiEvent::CheckSignerStatus),
            KeyCode::Char('a') => Some(UiEvent::OpenAttachmentInput),
            KeyCode::Char('r') => Some(UiEvent::ReloadFeed),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::ScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::ScrollDown),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => Some(UiEvent::SubmitReply),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}
