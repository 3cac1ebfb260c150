//! Chat session state for the interactive client.
//!
//! A `Session` lives for one client run. It holds the ordered chat history
//! and remembers whether the startup liveness check has already happened.
//! Nothing is persisted.

use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{info, warn};

use crate::answerer::Answer;
use crate::client::{ClientError, ServiceConnection};

/// One entry in the chat history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTurn {
    /// A question typed by the user
    User { content: String, at: OffsetDateTime },
    /// An answer from the query service with the sources it was built from
    Assistant {
        content: String,
        sources: Vec<String>,
        at: OffsetDateTime,
    },
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
            at: now(),
        }
    }

    pub fn assistant(answer: Answer) -> Self {
        let (content, sources) = answer.into_parts();
        Self::Assistant {
            content,
            sources,
            at: now(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::User { content, .. } | Self::Assistant { content, .. } => content,
        }
    }

    /// Source URLs; always empty for user turns.
    pub fn sources(&self) -> &[String] {
        match self {
            Self::User { .. } => &[],
            Self::Assistant { sources, .. } => sources,
        }
    }

    pub fn at(&self) -> OffsetDateTime {
        match self {
            Self::User { at, .. } | Self::Assistant { at, .. } => *at,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }

    /// Time of day the turn was recorded, as `HH:MM`.
    pub fn time_label(&self) -> String {
        self.at()
            .format(format_description!("[hour]:[minute]"))
            .unwrap_or_else(|_| "--:--".to_string())
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Result of submitting input to the session.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The input was blank; nothing was sent or recorded
    Skipped,
    /// The service answered and an assistant turn was appended
    Answered,
    /// The request failed; only the user turn was appended
    Failed(ClientError),
}

/// Explicit per-run client state.
#[derive(Debug, Default, Clone)]
pub struct Session {
    history: Vec<ChatTurn>,
    server_checked: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn server_checked(&self) -> bool {
        self.server_checked
    }

    /// Probes the service the first time it is called.
    ///
    /// Returns `Some(up)` on the first call and `None` afterwards.
    pub fn check_once(&mut self, connection: &mut ServiceConnection) -> Option<bool> {
        if self.server_checked {
            return None;
        }
        self.server_checked = true;
        let up = connection.probe();
        if !up {
            warn!("query service not running at {}", connection.endpoint());
        }
        Some(up)
    }

    /// Records `input` as a user turn.
    ///
    /// Returns the trimmed query, or `None` if the input is blank.
    pub fn record_query(&mut self, input: &str) -> Option<String> {
        let query = input.trim();
        if query.is_empty() {
            return None;
        }
        self.history.push(ChatTurn::user(query));
        Some(query.to_string())
    }

    /// Sends an already recorded `query` and appends the answer on success.
    pub fn complete(&mut self, query: &str, connection: &mut ServiceConnection) -> SubmitOutcome {
        match connection.ask(query) {
            Ok(answer) => {
                info!(sources = answer.sources().len(), "received answer");
                self.history.push(ChatTurn::assistant(answer));
                SubmitOutcome::Answered
            }
            Err(e) => {
                warn!("query failed: {}", e);
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Records `input` and sends it. Blank input is a no-op.
    pub fn submit(&mut self, input: &str, connection: &mut ServiceConnection) -> SubmitOutcome {
        match self.record_query(input) {
            Some(query) => self.complete(&query, connection),
            None => SubmitOutcome::Skipped,
        }
    }

    /// Empties the chat history.
    pub fn clear(&mut self) {
        self.history.clear();
    }
}
