use std::io::{self, Stdout};
use std::panic;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type ChatTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode plus alternate screen for the lifetime of the guard
pub struct TerminalGuard {
    terminal: ChatTerminal,
}

fn leave_screen() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }

        // Panics would otherwise print into the alternate screen and vanish
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            leave_screen();
            previous(info);
        }));

        let terminal = Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")?;
        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut ChatTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        leave_screen();
        let _ = self.terminal.show_cursor();
    }
}
