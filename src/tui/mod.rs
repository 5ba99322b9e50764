// Interactive chat interface
mod app;
mod commands;
mod events;
mod layout;
mod rendering;
mod terminal;
mod timestamps;

use std::path::PathBuf;

use anyhow::Result;
pub use app::App;
pub use commands::{SlashCommand, parse_command};

use self::terminal::TerminalGuard;
use crate::chat::ChatEngine;
use crate::history::SessionStore;

/// Run the chat TUI until the user quits. The session is saved on the way out.
pub fn run_chat(
    engine: ChatEngine,
    notice: Option<String>,
    store: SessionStore,
    config_dir: PathBuf,
) -> Result<()> {
    let mut app = App::new(engine, store, config_dir).with_notice(notice);

    let mut guard = TerminalGuard::enter()?;
    let res = app.run(guard.terminal_mut());
    drop(guard);

    res
}
