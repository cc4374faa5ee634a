// src/ui/tui.rs
//! Terminal setup and the main event loop.

use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::{
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::{app::App, audio::AudioOutput};

/// One display frame.
const FRAME: Duration = Duration::from_millis(16);

/// Restores the terminal even when the loop bails out with an error.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen).ok();
        self.terminal.show_cursor().ok();
    }
}

/// Run the UI until the user quits.
pub fn run<O: AudioOutput>(mut app: App<O>) -> Result<()> {
    let mut guard = TerminalGuard::enter()?;
    let mut last_tick = Instant::now();

    loop {
        guard.terminal.draw(|f| app.draw(f))?;
        let timeout = FRAME.checked_sub(last_tick.elapsed()).unwrap_or_default();

        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.on_key(key) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= FRAME {
            last_tick = Instant::now();
            app.tick();
        }
    }

    tracing::info!("exiting");
    Ok(())
}
