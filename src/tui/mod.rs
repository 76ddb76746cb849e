pub mod app;
pub mod render;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use crate::db::Backend;
use crate::error::Result;
use app::App;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run(backend: &dyn Backend) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = App::new();
    let result = run_loop(&mut terminal, &mut app, backend).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("terminal restored");
    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// One key at a time; a backend call is awaited to completion before the
/// next key is read.
async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    backend: &dyn Backend,
) -> Result<()> {
    loop {
        terminal.draw(|f| render::render(f, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Some(request) = app.handle_key(key) {
            app.busy = true;
            terminal.draw(|f| render::render(f, app))?;
            app.perform(backend, request).await;
            app.busy = false;
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
