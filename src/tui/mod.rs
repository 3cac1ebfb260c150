//! Terminal user interface for the chat client.
//!
//! Shows a question input, a notice line and the chat history using ratatui
//! for rendering and crossterm for terminal management.

use std::io;
use std::panic;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::client::ServiceConnection;
use crate::config::ClientConfig;

mod app;
pub mod event;
mod ui;

pub use app::{App, BUSY_MESSAGE, Focus, Notice};

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and enters the alternate screen.
///
/// # Errors
///
/// Returns an error if terminal initialization fails.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This should always be called before exiting the TUI,
/// even in error cases, to prevent terminal corruption.
///
/// # Errors
///
/// Returns an error if terminal restoration fails.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for the panic hook.
///
/// Ignores errors since we're likely already in a bad state.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Installs a panic hook that restores the terminal before the original hook runs.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Runs the main event loop for the TUI.
///
/// # Errors
///
/// Returns an error if event polling, rendering, or terminal operations fail.
/// Terminal state is always restored, even on error.
pub fn run_event_loop(app: &mut App, connection: &mut ServiceConnection) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop_internal(app, connection, &mut terminal);

    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

fn run_event_loop_internal(
    app: &mut App,
    connection: &mut ServiceConnection,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if crossterm_event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = crossterm_event::read()?
        {
            match event::handle_key_event(app, key) {
                event::KeyAction::Quit => break,
                event::KeyAction::Submit => {
                    if let Some(query) = app.begin_submit() {
                        // Show the busy notice before blocking on the request
                        terminal.draw(|frame| ui::draw(frame, app))?;
                        app.finish_submit(&query, connection);
                    }
                }
                event::KeyAction::Continue => {}
            }
        }
    }

    Ok(())
}

/// Entry point for `rag-search chat`.
///
/// Builds the service connection, runs the one-shot liveness check and starts
/// the event loop. A service launched during the session is stopped on exit.
///
/// # Errors
///
/// Returns an error if the connection cannot be built or the terminal fails.
pub fn run(config: &ClientConfig) -> Result<()> {
    init_panic_hook();

    let mut connection = config.connect()?;
    let mut app = App::new();

    info!(endpoint = %config.endpoint, launch = config.launch.is_some(), "starting chat client");
    app.check_server(&mut connection);

    let result = run_event_loop(&mut app, &mut connection).context("TUI event loop failed");
    connection.shutdown();
    info!("chat client stopped");

    result
}
