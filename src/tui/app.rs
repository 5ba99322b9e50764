//! Chat application state and event handling.
//!
//! The `App` owns the session and is the only writer of it. Each submitted
//! message opens a pending turn and hands a [`ReplyJob`] to a worker thread;
//! the reply comes back over an `mpsc` channel and fills that turn. Input is
//! refused while a reply is pending.
//!
//! Transient feedback (saves, clipboard, errors) goes to the status bar with
//! an expiry, and drawing only happens when state is dirty.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::{info, warn};

use super::commands::{SlashCommand, parse_command};
use super::events::{Action, poll_event};
use super::rendering::{RenderState, render_ui};
use crate::chat::{ChatEngine, OutgoingMessage, ReplyJob, WorkerEvent, is_exit_command, spawn_reply};
use crate::clipboard::{SystemClipboard, copy_to_clipboard};
use crate::history::{SessionStore, render_transcript};
use crate::models::{Attachment, Session};
use crate::notion::{NotionConfig, SystemBrowser, export_cases, resolve_export_source};
use crate::parsers::parse_cases;
use crate::utils::format_path_with_tilde;

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Input length cap (characters)
const MAX_INPUT_CHARS: usize = 4000;
const PAGE_LINES: u16 = 10;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

pub struct App {
    engine: ChatEngine,
    store: SessionStore,
    config_dir: PathBuf,
    session: Session,
    // Turns added since the last save
    unsaved: bool,
    input: String,
    attachments: Vec<Attachment>,
    pending: Option<usize>,
    scroll: u16,
    show_help: bool,
    should_quit: bool,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
    status_message: Option<StatusMessage>,
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    pub fn new(engine: ChatEngine, store: SessionStore, config_dir: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            engine,
            store,
            config_dir,
            session: Session::new(),
            unsaved: false,
            input: String::new(),
            attachments: Vec::new(),
            pending: None,
            scroll: 0,
            show_help: false,
            should_quit: false,
            tx,
            rx,
            status_message: None,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    /// Show a start-up notice, e.g. why the AI is unavailable
    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        if let Some(notice) = notice {
            self.set_status(notice, MessageType::Error, STATUS_ERROR_DURATION_MS);
        }
        self
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn set_success(&mut self, text: impl Into<String>) {
        self.set_status(text, MessageType::Success, STATUS_SUCCESS_DURATION_MS);
    }

    fn set_error(&mut self, text: impl Into<String>) {
        self.set_status(text, MessageType::Error, STATUS_ERROR_DURATION_MS);
    }

    /// Check and clear expired status messages
    fn check_and_clear_expired_status(&mut self) {
        let should_clear = self
            .status_message
            .as_ref()
            .map(|msg| Instant::now() >= msg.expires_at)
            .unwrap_or(false);
        if should_clear {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.check_and_clear_expired_status();
            self.drain_worker_events();

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            if self.needs_redraw || now.duration_since(self.last_draw_time) >= Duration::from_millis(100) {
                terminal.draw(|f| {
                    let ai_label = self.engine.ai_description();
                    let state = RenderState {
                        assistant_name: self.engine.name(),
                        ai_label: ai_label.as_deref(),
                        session_start: &self.session.start,
                        turns: &self.session.turns,
                        attachments: &self.attachments,
                        input: &self.input,
                        pending: self.pending.is_some(),
                        scroll: self.scroll,
                        show_help: self.show_help,
                        status_message: self.status_message.as_ref(),
                    };
                    render_ui(f, &state);
                })?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100))?;
            self.handle_action(action);
        }

        self.save_on_exit();
        Ok(())
    }

    /// Apply every reply that has arrived
    fn drain_worker_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.handle_worker_event(event),
                Err(TryRecvError::Empty) => break,
                // App holds a sender, so this only happens during teardown
                Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn handle_worker_event(&mut self, event: WorkerEvent) {
        let WorkerEvent::Reply { turn, reply } = event;

        if let Err(e) = self.session.fill_response(turn, reply.text.clone(), reply.was_ai) {
            warn!("Dropping reply for turn {}: {:#}", turn, e);
            return;
        }
        if let Some(user) = self.session.turns.get(turn).map(|t| t.user.clone()) {
            self.engine.record(user, reply.text);
        }
        if self.pending == Some(turn) {
            self.pending = None;
        }
        self.unsaved = true;
        self.scroll = 0;
        self.needs_redraw = true;
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        if self.show_help && action != Action::None {
            self.show_help = false;
            self.needs_redraw = true;
            return;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::ClearInput => {
                if self.input.is_empty() {
                    self.should_quit = true;
                } else {
                    self.input.clear();
                    self.needs_redraw = true;
                }
            }
            Action::ScrollUp => self.scroll_by(1),
            Action::ScrollDown => self.scroll_by(-1),
            Action::PageUp => self.scroll_by(PAGE_LINES as i32),
            Action::PageDown => self.scroll_by(-(PAGE_LINES as i32)),
            Action::Submit => self.submit(),
            Action::CopyLastReply => self.copy_last_reply(),
            Action::NewConversation => self.new_conversation(),
            Action::Save => self.save_session(),
            Action::InsertChar(c) => self.insert_char(c),
            Action::DeleteChar => self.delete_char(),
            Action::None => {}
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let old = self.scroll;
        self.scroll = (i32::from(self.scroll) + delta).clamp(0, i32::from(u16::MAX)) as u16;
        if old != self.scroll {
            self.needs_redraw = true;
        }
    }

    fn insert_char(&mut self, c: char) {
        if self.pending.is_some() {
            return;
        }
        if self.input.chars().count() < MAX_INPUT_CHARS {
            self.input.push(c);
            self.needs_redraw = true;
        }
    }

    fn delete_char(&mut self) {
        if self.input.pop().is_some() {
            self.needs_redraw = true;
        }
    }

    fn submit(&mut self) {
        if self.pending.is_some() {
            self.set_error("✗ Wait for the current reply");
            return;
        }

        let text = std::mem::take(&mut self.input);
        self.needs_redraw = true;

        if let Some(command) = parse_command(&text) {
            match command {
                Ok(command) => self.run_command(command),
                Err(e) => self.set_error(format!("✗ {}", e)),
            }
            return;
        }

        if is_exit_command(&text) {
            self.should_quit = true;
            return;
        }

        let attachments = std::mem::take(&mut self.attachments);
        let Some(message) = OutgoingMessage::compose(&text, attachments) else {
            self.set_error("✗ Type a message or attach a file");
            return;
        };

        let turn = self.session.begin_turn(message.history_text());
        self.unsaved = true;
        let job = ReplyJob { turn, engine: self.engine.clone(), history: self.engine.history(), message };
        match spawn_reply(job, self.tx.clone()) {
            Ok(_) => {
                self.pending = Some(turn);
                self.scroll = 0;
            }
            Err(e) => {
                warn!("{:#}", e);
                if let Err(e) = self.session.fill_response(turn, format!("❌ {}", e), false) {
                    warn!("{:#}", e);
                }
                self.set_error(format!("✗ {}", e));
            }
        }
    }

    fn run_command(&mut self, command: SlashCommand) {
        match command {
            SlashCommand::Attach(path) => self.attach(path),
            SlashCommand::Detach(n) => {
                if n <= self.attachments.len() {
                    let removed = self.attachments.remove(n - 1);
                    self.set_success(format!("✓ Removed {}", removed.file_name()));
                } else {
                    self.set_error(format!("✗ No attachment number {}", n));
                }
            }
            SlashCommand::ClearAttachments => {
                self.attachments.clear();
                self.set_success("✓ Attachments cleared");
            }
            SlashCommand::New => self.new_conversation(),
            SlashCommand::Save => self.save_session(),
            SlashCommand::Export(path) => self.export_transcript(&path),
            SlashCommand::Notion => self.export_to_notion(),
            SlashCommand::Help => {
                self.show_help = true;
                self.needs_redraw = true;
            }
            SlashCommand::Quit => self.should_quit = true,
        }
    }

    fn attach(&mut self, path: PathBuf) {
        if !path.is_file() {
            self.set_error(format!("✗ Not a file: {}", format_path_with_tilde(&path)));
            return;
        }
        if self.attachments.iter().any(|a| a.path == path) {
            self.set_error("✗ File already attached");
            return;
        }
        let attachment = Attachment::new(path);
        self.set_success(format!("✓ Attached {}", attachment.display_label()));
        self.attachments.push(attachment);
    }

    fn copy_last_reply(&mut self) {
        let Some(reply) = self.session.last_reply().map(str::to_string) else {
            self.set_error("✗ No reply to copy");
            return;
        };
        match copy_to_clipboard(&reply) {
            Ok(()) => self.set_success("✓ Copied to clipboard"),
            Err(e) => self.set_error(format!("✗ Clipboard error: {}", e)),
        }
    }

    /// Write the session if it has turns. Returns the new file, if any.
    fn persist(&mut self) -> Result<Option<PathBuf>> {
        if self.session.is_empty() {
            return Ok(None);
        }
        let path = self.store.save(&mut self.session)?;
        self.unsaved = false;
        Ok(Some(path))
    }

    fn save_session(&mut self) {
        match self.persist() {
            Ok(Some(path)) => self.set_success(format!("✓ Saved to {}", format_path_with_tilde(&path))),
            Ok(None) => self.set_error("✗ Nothing to save yet"),
            Err(e) => self.set_error(format!("✗ Save failed: {:#}", e)),
        }
    }

    fn save_on_exit(&mut self) {
        if !self.unsaved {
            return;
        }
        match self.persist() {
            Ok(Some(path)) => info!("Session saved on exit to {}", path.display()),
            Ok(None) => {}
            Err(e) => warn!("Failed to save session on exit: {:#}", e),
        }
    }

    fn new_conversation(&mut self) {
        if self.pending.is_some() {
            self.set_error("✗ Wait for the current reply");
            return;
        }
        if self.unsaved
            && let Err(e) = self.persist()
        {
            self.set_error(format!("✗ Save failed, conversation kept: {:#}", e));
            return;
        }
        self.session = Session::new();
        self.engine.clear_history();
        self.attachments.clear();
        self.scroll = 0;
        self.set_success("✓ New conversation started");
    }

    fn export_transcript(&mut self, path: &Path) {
        if self.session.is_empty() {
            self.set_error("✗ Nothing to export yet");
            return;
        }
        let title = format!("{} conversation", self.engine.name());
        let text = render_transcript(&self.session, &title);
        match fs::write(path, text).with_context(|| format!("Failed to write {}", path.display())) {
            Ok(()) => self.set_success(format!("✓ Exported to {}", format_path_with_tilde(path))),
            Err(e) => self.set_error(format!("✗ {:#}", e)),
        }
    }

    fn export_to_notion(&mut self) {
        let config = NotionConfig::load(&self.config_dir);
        if !config.is_configured() {
            self.set_error("✗ Notion is not configured. Run `qa-assistant notion configure <ID_OR_URL>`");
            return;
        }

        let result = (|| -> Result<usize> {
            let mut clipboard = SystemClipboard::new()?;
            let source = resolve_export_source(None, self.session.last_ai_reply(), &mut clipboard)?
                .context("No test cases found. Ask for test cases first")?;
            let cases = parse_cases(&source.text);
            let report = export_cases(&cases, &config, &mut clipboard, &SystemBrowser)?;
            Ok(report.total)
        })();

        match result {
            Ok(total) => self.set_success(format!("✓ {} cases copied, Notion opened", total)),
            Err(e) => self.set_error(format!("✗ {:#}", e)),
        }
    }
}
