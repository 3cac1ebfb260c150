//! UI rendering functions for the TUI.
//!
//! Draws the header, notice line, question input, chat history and shortcut
//! bar using ratatui widgets and layout management.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::app::{App, Focus, Notice};
use crate::session::ChatTurn;

const TITLE: &str = "RAG Search System";
const SUBTITLE: &str = "Ask anything and get answers based on the latest web information";

/// Main rendering function for the TUI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Subtitle
            Constraint::Length(1), // Notice
            Constraint::Length(3), // Question input
            Constraint::Min(0),    // Chat history
            Constraint::Length(1), // Shortcut bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], chunks[1]);
    render_notice(frame, app, chunks[2]);
    render_input(frame, app, chunks[3]);
    render_history(frame, app, chunks[4]);
    render_shortcut_bar(frame, app, chunks[5]);
}

fn render_header(frame: &mut Frame, title_area: Rect, subtitle_area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        TITLE,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    let subtitle = Paragraph::new(Line::from(Span::styled(
        SUBTITLE,
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(title, title_area);
    frame.render_widget(subtitle, subtitle_area);
}

fn render_notice(frame: &mut Frame, app: &App, area: Rect) {
    let Some(notice) = app.notice() else {
        return;
    };

    let style = match notice {
        Notice::Warning(_) => Style::default().fg(Color::Yellow),
        Notice::Error(_) => Style::default().fg(Color::Red),
        Notice::Busy => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::ITALIC),
    };

    frame.render_widget(Paragraph::new(Span::styled(notice.text(), style)), area);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Renders the question input with a cursor indicator when focused.
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus() == Focus::Input;

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Enter your question")
        .border_style(focus_style(is_focused));

    let mut content = app.input().to_string();
    if is_focused && !app.is_busy() {
        content.push('█');
    }

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Builds the chat history, oldest turn first.
fn history_text(app: &App) -> Text<'_> {
    let turns = app.session().history();
    if turns.is_empty() {
        return Text::from(Line::from(Span::styled(
            "No messages yet. Type a question and press Enter.",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let label = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let mut text = Text::default();

    for turn in turns {
        match turn {
            ChatTurn::User { content, .. } => {
                text.lines.push(Line::from(vec![
                    Span::styled("You: ", label.fg(Color::Green)),
                    Span::raw(content.as_str()),
                    Span::styled(format!("  {}", turn.time_label()), dim),
                ]));
            }
            ChatTurn::Assistant {
                content, sources, ..
            } => {
                text.lines.push(Line::from(vec![
                    Span::styled("Assistant:", label.fg(Color::Cyan)),
                    Span::styled(format!("  {}", turn.time_label()), dim),
                ]));
                text.lines
                    .extend(tui_markdown::from_str(content).lines);

                if !sources.is_empty() {
                    text.lines.push(Line::from(Span::styled("Sources:", label)));
                    for (i, source) in sources.iter().enumerate() {
                        text.lines.push(Line::from(vec![
                            Span::raw(format!("{}. ", i + 1)),
                            Span::styled(
                                source.as_str(),
                                Style::default()
                                    .fg(Color::Blue)
                                    .add_modifier(Modifier::UNDERLINED),
                            ),
                        ]));
                    }
                }
            }
        }
        text.lines.push(Line::from(Span::styled("---", dim)));
    }

    text
}

/// Renders the chat history panel, following the newest turn unless the user
/// has scrolled up.
fn render_history(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus() == Focus::History;

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Chat History")
        .border_style(focus_style(is_focused));

    let inner = block.inner(area);
    let paragraph = Paragraph::new(history_text(app)).wrap(Wrap { trim: false });

    // Counted without the block so the wrap width is the inner width
    let rows = u16::try_from(paragraph.line_count(inner.width)).unwrap_or(u16::MAX);
    let max_scroll = rows.saturating_sub(inner.height);
    app.set_max_scroll(max_scroll);
    let offset = max_scroll.saturating_sub(app.scroll_from_bottom().min(max_scroll));

    let paragraph = paragraph.block(block).scroll((offset, 0));

    frame.render_widget(paragraph, area);
}

/// Renders the shortcut bar at the bottom of the screen.
///
/// Format: `Key: action | Key: action` with keys highlighted in cyan.
fn render_shortcut_bar(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let sep_style = Style::default().fg(Color::DarkGray);

    let shortcuts: &[(&str, &str)] = match app.focus() {
        Focus::Input => &[
            ("Enter", "search"),
            ("Ctrl+L", "clear history"),
            ("Tab", "history"),
            ("Ctrl+C", "quit"),
        ],
        Focus::History => &[
            ("j/k", "scroll"),
            ("g/G", "top/bottom"),
            ("Ctrl+L", "clear history"),
            ("Esc", "back to input"),
            ("q", "quit"),
        ],
    };

    let mut spans = Vec::new();
    for (i, (key, action)) in shortcuts.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", sep_style));
        }
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::raw(format!(": {action}")));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
