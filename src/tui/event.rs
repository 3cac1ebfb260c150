//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to application state changes. Key behavior
//! depends on which panel has focus.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{App, Focus};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Keep running
    Continue,
    /// Submit the current input
    Submit,
    /// Exit the TUI
    Quit,
}

/// Handles a keyboard event and updates the app state accordingly.
///
/// # Event Handling
///
/// - `Ctrl+C`: Quit from anywhere
/// - `Ctrl+L`: Clear the chat history
/// - `Tab` / `Shift+Tab`: Switch focus between input and history
/// - `Esc`: Return to the input
/// - When `Input` focused: characters edit the question, `Enter` submits
/// - When `History` focused: j/k or arrows scroll, g/G jump to top/bottom, `q` quits
///
/// # Examples
///
/// ```
/// use rag_search::tui::{App, event::{KeyAction, handle_key_event}};
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
///
/// let mut app = App::new();
/// let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
/// assert_eq!(handle_key_event(&mut app, key), KeyAction::Quit);
/// ```
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> KeyAction {
    // Windows reports releases as well as presses
    if key.kind == KeyEventKind::Release {
        return KeyAction::Continue;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return KeyAction::Quit,
            KeyCode::Char('l') => {
                app.clear_history();
                return KeyAction::Continue;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Tab | KeyCode::BackTab => {
            app.next_focus();
            return KeyAction::Continue;
        }
        KeyCode::Esc => {
            app.reset_focus();
            return KeyAction::Continue;
        }
        _ => {}
    }

    match app.focus() {
        Focus::Input => handle_input(app, key),
        Focus::History => handle_history(app, key),
    }
}

/// Handles keyboard input when the question input is focused.
fn handle_input(app: &mut App, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter => return KeyAction::Submit,
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            app.push_input_char(c);
        }
        KeyCode::Backspace => app.pop_input_char(),
        _ => {}
    }
    KeyAction::Continue
}

/// Handles keyboard input when the chat history is focused.
fn handle_history(app: &mut App, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::PageDown => app.scroll_down(10),
        KeyCode::PageUp => app.scroll_up(10),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.scroll_to_bottom(),
        _ => {}
    }
    KeyAction::Continue
}
