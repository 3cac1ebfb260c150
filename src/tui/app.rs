use std::cell::Cell;

use crate::client::ServiceConnection;
use crate::session::{Session, SubmitOutcome};

/// Shown while a request is in flight.
pub const BUSY_MESSAGE: &str = "Searching the internet and generating response...";

/// Application state for the TUI.
///
/// Owns the chat `Session` plus everything that only matters on screen:
/// input buffer, focus, history scroll position and the notice line.
#[derive(Debug, Clone)]
pub struct App {
    session: Session,
    /// Question input buffer
    input: String,
    /// Currently focused panel
    focus: Focus,
    /// History scroll position counted in lines up from the bottom; 0 follows
    /// the newest turn
    scroll_from_bottom: u16,
    /// Largest useful scroll value, written by the renderer each frame
    max_scroll: Cell<u16>,
    notice: Option<Notice>,
}

/// Panel focus state for keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Typing edits the question
    Input,
    /// j/k/g/G scroll the chat history
    History,
}

/// One-line status message above the input box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
    Busy,
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Warning(text) | Self::Error(text) => text,
            Self::Busy => BUSY_MESSAGE,
        }
    }
}

impl App {
    /// Creates an App with an empty session and input focus.
    ///
    /// # Examples
    ///
    /// ```
    /// use rag_search::tui::{App, Focus};
    ///
    /// let app = App::new();
    /// assert!(app.session().history().is_empty());
    /// assert_eq!(app.focus(), Focus::Input);
    /// ```
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            input: String::new(),
            focus: Focus::Input,
            scroll_from_bottom: 0,
            max_scroll: Cell::new(0),
            notice: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn is_busy(&self) -> bool {
        self.notice == Some(Notice::Busy)
    }

    /// Runs the one-shot startup probe and sets a warning if the service is down.
    pub fn check_server(&mut self, connection: &mut ServiceConnection) {
        if self.session.check_once(connection) == Some(false) {
            let message = if connection.can_launch() {
                "The query service is not running. It will be started automatically when you submit a query."
            } else {
                "The query service is not running. Make sure to start it before making queries."
            };
            self.notice = Some(Notice::Warning(message.to_string()));
        }
    }

    pub fn push_input_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input_char(&mut self) {
        self.input.pop();
    }

    /// Moves the input into the history as a user turn and marks the app busy.
    ///
    /// Returns the query to send, or `None` (input untouched) if it is blank.
    pub fn begin_submit(&mut self) -> Option<String> {
        let query = self.session.record_query(&self.input)?;
        self.input.clear();
        self.scroll_to_bottom();
        self.notice = Some(Notice::Busy);
        Some(query)
    }

    /// Sends `query` and records the outcome.
    pub fn finish_submit(&mut self, query: &str, connection: &mut ServiceConnection) {
        self.notice = match self.session.complete(query, connection) {
            SubmitOutcome::Answered | SubmitOutcome::Skipped => None,
            SubmitOutcome::Failed(error) => Some(Notice::Error(error.to_string())),
        };
        self.scroll_to_bottom();
    }

    /// Clears the chat history and any notice.
    pub fn clear_history(&mut self) {
        self.session.clear();
        self.notice = None;
        self.scroll_to_bottom();
    }

    /// Cycles focus between input and history.
    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::History,
            Focus::History => Focus::Input,
        };
    }

    /// Returns focus to the input box.
    pub fn reset_focus(&mut self) {
        self.focus = Focus::Input;
    }

    pub fn scroll_from_bottom(&self) -> u16 {
        self.scroll_from_bottom
    }

    /// Records how far the history can scroll; called by the renderer.
    pub(super) fn set_max_scroll(&self, max: u16) {
        self.max_scroll.set(max);
    }

    /// Scrolls toward older turns.
    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_from_bottom = self
            .scroll_from_bottom
            .saturating_add(lines)
            .min(self.max_scroll.get());
    }

    /// Scrolls toward newer turns.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_from_bottom = self.max_scroll.get();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
