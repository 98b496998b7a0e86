use chrono::{DateTime, Local, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::models::{Session, SignerStatus};

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Spinner glyph for animation frame `tick`
pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

/// Timestamp in the viewer's local time
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Renders a bordered text block
pub fn render_panel<'a>(lines: Vec<Line<'a>>, title: &'a str, accent: Color) -> Paragraph<'a> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(title, Style::default().fg(accent).bold()));

    Paragraph::new(lines).block(block).wrap(Wrap { trim: false })
}

/// Label for the cast button
pub fn cast_button_label(is_submitting: bool) -> &'static str {
    if is_submitting {
        "Casting..."
    } else {
        "Cast"
    }
}

/// Session status color
pub fn session_color(session: Option<&Session>) -> Color {
    match session.map(|s| &s.status) {
        None => Color::DarkGray,
        Some(SignerStatus::PendingApproval) => Color::Yellow,
        Some(SignerStatus::Approved) => Color::Green,
        Some(SignerStatus::Other(_)) => Color::Red,
    }
}

/// One-line description of the session for the status bar
pub fn session_summary(session: Option<&Session>) -> String {
    match session {
        None => "Not signed in (l: sign in)".to_string(),
        Some(s) => match &s.status {
            SignerStatus::PendingApproval => match &s.signer_approval_url {
                Some(url) => format!("Approve sign-in at {}", url),
                None => "Waiting for signer approval".to_string(),
            },
            SignerStatus::Approved => match s.fid {
                Some(fid) => format!("Signed in as fid {}", fid),
                None => "Signed in".to_string(),
            },
            SignerStatus::Other(status) => format!("Signer {}", status),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(status: SignerStatus) -> Session {
        Session {
            signer_uuid: "u".into(),
            public_key: "k".into(),
            status,
            signer_approval_url: Some("https://approve".into()),
            fid: Some(3),
        }
    }

    #[test]
    fn test_session_summary() {
        assert_eq!(session_summary(None), "Not signed in (l: sign in)");
        assert_eq!(
            session_summary(Some(&session(SignerStatus::PendingApproval))),
            "Approve sign-in at https://approve"
        );
        assert_eq!(
            session_summary(Some(&session(SignerStatus::Approved))),
            "Signed in as fid 3"
        );
    }

    #[test]
    fn test_cast_button_label() {
        assert_eq!(cast_button_label(false), "Cast");
        assert_eq!(cast_button_label(true), "Casting...");
    }

    #[test]
    fn test_spinner_wraps() {
        assert_eq!(spinner_frame(0), spinner_frame(SPINNER.len()));
    }
}
