use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use log::{error, info};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::app::App;
use super::helpers::surface_error;
use crate::config::APP_TITLE;

/// Spin up the terminal backend, enter the draw loop, and keep processing input
/// until the user quits. The terminal is restored even when the loop fails.
pub fn run_app(app: &mut App) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    undo_on_err(
        execute!(stdout, EnterAlternateScreen, SetTitle(APP_TITLE)),
        restore_raw_mode,
    )
    .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = undo_on_err(Terminal::new(backend), || {
        if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen) {
            error!("failed to leave alternate screen: {err}");
        }
        restore_raw_mode();
    })
    .context("failed to create terminal backend")?;
    info!("terminal session started");

    let result = event_loop(&mut terminal, app);
    if let Err(err) = &result {
        error!("event loop stopped: {}", surface_error(err));
    }

    cleanup_terminal(&mut terminal)?;
    info!("terminal session ended");
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        if !event::poll(Duration::from_millis(250)).context("event polling failed")? {
            continue;
        }
        let Event::Key(key_event) = event::read().context("failed to read event")? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }

        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key_event.code, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            return Ok(());
        }

        if app.handle_key_event(key_event) {
            return Ok(());
        }
    }
}

/// Run `undo` when a setup step failed, then hand its result back.
fn undo_on_err<T, E>(step: Result<T, E>, undo: impl FnOnce()) -> Result<T, E> {
    step.inspect_err(|_| undo())
}

fn restore_raw_mode() {
    if let Err(err) = disable_raw_mode() {
        error!("failed to disable raw mode: {err}");
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_setup_step_is_undone() {
        let mut undone = false;
        let failed: io::Result<()> = undo_on_err(Err(io::Error::other("no tty")), || undone = true);
        assert!(failed.is_err());
        assert!(undone);

        let mut undone = false;
        let ok = undo_on_err(Ok::<_, io::Error>(7), || undone = true);
        assert_eq!(ok.unwrap(), 7);
        assert!(!undone);
    }
}
