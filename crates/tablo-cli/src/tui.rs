use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use tablo_adapters::ResourceAdapter;

use crate::presentation::components::BrowserComponent;

/// Raw-mode + alternate-screen guard. Restores the terminal on drop so
/// a panic or early return never leaves the shell unusable.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        // Ctrl+C bypasses the event loop in raw mode edge cases;
        // restore the terminal before exiting either way.
        ctrlc::set_handler(move || {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            std::process::exit(0);
        })?;

        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    }
}

/// Drive the browser component: draw, poll input, repeat. Fetch
/// completions arrive through the cache's watch channel and show up on
/// the next tick's draw; input stays responsive while requests are in
/// flight.
pub async fn run_component<A: ResourceAdapter + 'static>(
    component: &mut BrowserComponent<A>,
) -> Result<()> {
    let mut guard = TerminalGuard::new()?;
    component.sync();

    loop {
        guard.terminal.draw(|f| component.render(f))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => component.handle_key(key).await?,
                Event::Mouse(mouse) => component.handle_mouse(mouse).await?,
                _ => {}
            }
        }

        if component.should_quit() {
            break;
        }
    }
    Ok(())
}
