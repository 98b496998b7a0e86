//! vibra - livestream chat in the terminal
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async calls against the vibra API

use std::io;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;

use vibra_tui::constants::{APP_NAME, APP_VERSION};
use vibra_tui::messages::ui_events::{key_to_ui_event, InputMode};
use vibra_tui::storage::SessionStore;
use vibra_tui::ui::{cast_button_label, format_timestamp, render_panel, session_color, session_summary, spinner_frame};
use vibra_tui::{
    ApiClient, AppActor, AppState, Config, NetworkActor, NetworkCommand, NetworkResponse, RenderState,
    SessionManager, UiEvent,
};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // Initialize logging to file
    let log_dir = config.log_file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(std::path::Path::new("."));
    let log_name = config.log_file.file_name().unwrap_or(std::ffi::OsStr::new("vibra.log"));
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(api_url = %config.api_url, data_dir = %config.data_dir.display(), "Starting {}", APP_NAME);

    // The session provider wraps everything the app actor renders
    let session = SessionManager::restore(SessionStore::new(&config.data_dir));
    let state = AppState::new(session);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let api = ApiClient::new(config.api_url.clone(), config.request_timeout);
    let network_actor = NetworkActor::new(api, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx, config.signer_poll_interval);
    tokio::spawn(async move {
        if let Err(e) = app_actor.run(ui_rx, net_resp_rx).await {
            tracing::error!(error = %e, "App actor stopped");
        }
    });

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();
    let mut tick: usize = 0;

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state, tick))?;
        tick = tick.wrapping_add(1);

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.show_attachment_input,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState, tick: usize) {
    let area = f.area();

    if state.is_loading() {
        draw_loading(f, area, tick);
        return;
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Stream bar
            Constraint::Min(0),     // Panels
            Constraint::Length(1),  // Session bar
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_stream_bar(f, state, main_chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(main_chunks[1]);

    draw_info_panel(f, state, columns[0]);
    draw_chat(f, state, columns[1]);
    draw_participants(f, state, columns[2]);

    draw_session_bar(f, state, main_chunks[2]);
    draw_status_bar(f, state, main_chunks[3]);

    if state.show_help {
        draw_help_popup(f, area);
    }

    if state.show_attachment_input {
        draw_attachment_popup(f, state, area);
    }
}

fn draw_loading(f: &mut Frame, area: Rect, tick: usize) {
    let spinner = Paragraph::new(spinner_frame(tick))
        .style(Style::default().fg(Color::Magenta).bold())
        .alignment(Alignment::Center);
    let row = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Length(1), Constraint::Min(0)])
        .split(area)[1];
    f.render_widget(spinner, row);
}

fn draw_stream_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(live) = &state.livestream else { return };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Magenta).bold()));

    let line = Line::from(vec![
        Span::styled("▶ ", Style::default().fg(Color::Red)),
        Span::raw(live.stream_url.as_str()),
    ]);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_info_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(live) = &state.livestream else { return };
    let heading = Style::default().fg(Color::White).bold();
    let muted = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::from(Span::styled(live.streamer.display_name.as_str(), Style::default().fg(Color::Magenta).bold())),
        Line::from(Span::styled(format!("@{}", live.streamer.username), muted)),
        Line::from(Span::styled(format!("{} followers", live.streamer.follower_count), muted)),
        Line::from(""),
        Line::from(Span::styled("Channel", heading)),
        Line::from(live.channel.name.as_str()),
        Line::from(""),
        Line::from(Span::styled("Engagement", heading)),
        Line::from(format!("👍 {} likes", live.likes_count)),
        Line::from(format!("🔁 {} recasts", live.recasts_count)),
        Line::from(format!("💬 {} replies", live.replies_count)),
        Line::from(""),
        Line::from(Span::styled("Cast", heading)),
        Line::from(live.text.as_str()),
        Line::from(Span::styled(format_timestamp(&live.timestamp), muted)),
    ];

    f.render_widget(render_panel(lines, " Livestream Info ", Color::Magenta), area);
}

fn draw_chat(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    draw_compose_box(f, state, chunks[0]);
    draw_replies(f, state, chunks[1]);
}

fn draw_compose_box(f: &mut Frame, state: &RenderState, area: Rect) {
    let editing = state.input_mode == InputMode::Editing;
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Magenta)
    };

    let button = cast_button_label(state.is_submitting);
    let button_style = if state.is_submitting {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Black).bg(Color::Magenta).bold()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Reply (e:edit  a:attach) ")
        .title_bottom(Line::from(Span::styled(format!(" {} ", button), button_style)).right_aligned());

    let content = if state.draft.is_empty() && !editing {
        Paragraph::new(Span::styled("Welcome to the chat...", Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(state.draft.as_str())
    };
    f.render_widget(content.block(block).wrap(Wrap { trim: false }), area);

    if editing {
        let prefix_width = state.draft[..state.cursor_position.min(state.draft.len())].chars().count() as u16;
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + prefix_width + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_replies(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for reply in &state.replies {
        lines.push(Line::from(vec![
            Span::styled(reply.author.display_name.as_str(), Style::default().fg(Color::Magenta).bold()),
            Span::styled(format!(" @{}", reply.author.username), Style::default().fg(Color::DarkGray)),
        ]));
        lines.push(Line::from(reply.text.as_str()));
        lines.push(Line::from(vec![
            Span::styled(format_timestamp(&reply.timestamp), Style::default().fg(Color::DarkGray)),
            Span::raw(format!(
                "  ❤️ {}  🔁 {}",
                reply.reactions.likes_count, reply.reactions.recasts_count
            )),
        ]));
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Replies ({}) ", state.replies.len()));

    let replies = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.replies_scroll, 0));
    f.render_widget(replies, area);
}

fn draw_participants(f: &mut Frame, state: &RenderState, area: Rect) {
    let items: Vec<ListItem> = state
        .participants
        .iter()
        .map(|p| ListItem::new(p.display_name.as_str()))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(Span::styled(" Participants ", Style::default().fg(Color::Magenta).bold())),
    );
    f.render_widget(list, area);
}

fn draw_session_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let session = state.session.as_ref();
    let bar = Paragraph::new(format!(" {} ", session_summary(session)))
        .style(Style::default().fg(session_color(session)));
    f.render_widget(bar, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.input_mode == InputMode::Editing {
        " ESC:stop editing | Enter:cast | arrows:move "
    } else {
        " e:edit | s:cast | l:sign in | o:sign out | p:check signer | r:reload | ?:help | q:quit "
    };

    let bar = Paragraph::new(status)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 CHAT
   e / i              Edit reply
   Enter              Cast (while editing)
   s                  Cast
   Esc                Stop editing
   a                  Choose an attachment
   ↑ / ↓              Scroll replies
   r                  Reload livestream

 ACCOUNT
   l                  Sign in with Farcaster
   p                  Check signer approval now
   o                  Sign out

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} {} ", APP_NAME, APP_VERSION))
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_attachment_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(60, 20, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Attach image (Enter to select, Tab to complete, Esc to cancel) ")
        .style(Style::default().bg(Color::Black));

    let content = if state.attachment_path_input.is_empty() {
        "Enter a file path...\n\nExample: ~/Pictures/stream.png"
    } else {
        &state.attachment_path_input
    };

    let input = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(input, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
