use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::ai::{GenerationError, TextGenerator};
use crate::attachments::render_attachments;
use crate::models::Attachment;
use crate::responder::{
    ATTACHMENTS_MARKER, Exchange, LocalResponder, build_prompt, offline_attachment_reply,
    recent_history, split_message,
};
use crate::utils::sanitize_for_terminal;

/// Exchanges kept in memory for prompt context
pub const HISTORY_CAPACITY: usize = 10;
/// Exchanges rendered into each prompt by default
pub const DEFAULT_PROMPT_WINDOW: usize = 3;

pub const ATTACHMENTS_ONLY_TEXT: &str = "Please analyze the attached files.";
pub const ATTACHMENTS_HISTORY_TEXT: &str = "Attached file analysis";

const EXIT_WORDS: &[&str] = &["exit", "quit", "salir"];

/// Pause before the single retry of a retryable AI failure
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// A reply and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub was_ai: bool,
}

impl Reply {
    fn local(text: String) -> Self {
        Self { text, was_ai: false }
    }
}

/// Typed text plus the files picked for one send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

impl OutgoingMessage {
    /// `None` when there is nothing to send
    pub fn compose(text: &str, attachments: Vec<Attachment>) -> Option<Self> {
        let text = text.trim();
        match (text.is_empty(), attachments.is_empty()) {
            (true, true) => None,
            (true, false) => Some(Self { text: ATTACHMENTS_ONLY_TEXT.to_string(), attachments }),
            (false, _) => Some(Self { text: text.to_string(), attachments }),
        }
    }

    /// Text recorded in the turn and the prompt history
    pub fn history_text(&self) -> String {
        if self.text.trim().is_empty() {
            ATTACHMENTS_HISTORY_TEXT.to_string()
        } else {
            self.text.trim().to_string()
        }
    }

    /// Full message with the extracted attachment text appended.
    /// Reads every attached file.
    pub fn render(&self) -> String {
        if self.attachments.is_empty() {
            return self.text.clone();
        }
        format!(
            "{}\n\n{}\n{}",
            self.text,
            ATTACHMENTS_MARKER,
            render_attachments(&self.attachments)
        )
    }
}

/// Part of a full message that is kept in history
pub fn history_text(message: &str) -> String {
    let (typed, _) = split_message(message);
    if typed.is_empty() { ATTACHMENTS_HISTORY_TEXT.to_string() } else { typed.to_string() }
}

pub fn is_exit_command(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    EXIT_WORDS.contains(&text.as_str())
}

/// Rate limits and server errors get one more attempt before the caller
/// falls back to a local reply
fn generate_with_retry(generator: &dyn TextGenerator, prompt: &str) -> Result<String, GenerationError> {
    match generator.generate(prompt) {
        Err(e) if e.is_retryable() => {
            warn!("AI request failed, retrying once: {}", e);
            thread::sleep(RETRY_DELAY);
            generator.generate(prompt)
        }
        result => result,
    }
}

/// Decides between the AI and the local responder and keeps prompt context.
///
/// Cloning is cheap; workers get a clone plus a snapshot of the history window.
#[derive(Clone)]
pub struct ChatEngine {
    name: String,
    responder: Arc<LocalResponder>,
    generator: Option<Arc<dyn TextGenerator>>,
    prompt_window: usize,
    history: VecDeque<Exchange>,
}

impl std::fmt::Debug for ChatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatEngine")
            .field("name", &self.name)
            .field("ai", &self.generator.as_ref().map(|g| g.describe()))
            .field("history", &self.history.len())
            .finish()
    }
}

impl ChatEngine {
    pub fn new(name: impl Into<String>, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        let name = name.into();
        Self {
            responder: Arc::new(LocalResponder::new(&name)),
            name,
            generator,
            prompt_window: DEFAULT_PROMPT_WINDOW,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    pub fn with_prompt_window(mut self, window: usize) -> Self {
        self.prompt_window = window.min(HISTORY_CAPACITY);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ai_available(&self) -> bool {
        self.generator.is_some()
    }

    pub fn ai_description(&self) -> Option<String> {
        self.generator.as_ref().map(|g| g.describe())
    }

    pub fn history(&self) -> Vec<Exchange> {
        self.history.iter().cloned().collect()
    }

    /// Pick the route for `message` and produce the reply. Calls the AI when
    /// the route needs it, so this blocks; run it off the UI thread.
    pub fn plan_reply(&self, message: &str, history: &[Exchange]) -> Reply {
        let (_, attached) = split_message(message);
        let small_talk = LocalResponder::is_small_talk(message);

        if small_talk && attached.is_none() {
            debug!("Answering small talk locally");
            return Reply::local(self.responder.respond(message));
        }

        let Some(generator) = &self.generator else {
            return match attached {
                Some(attached) => Reply::local(offline_attachment_reply(attached)),
                None => Reply::local(self.responder.respond(message)),
            };
        };

        let context = recent_history(history, &self.name, self.prompt_window);
        let prompt = build_prompt(&self.name, message, &context);
        match generate_with_retry(generator.as_ref(), &prompt) {
            Ok(text) => {
                info!("AI reply received ({} chars)", text.len());
                Reply { text: sanitize_for_terminal(&text), was_ai: true }
            }
            Err(e) => {
                warn!("AI request failed, falling back to local reply: {}", e);
                Reply::local(self.responder.respond(message))
            }
        }
    }

    /// Remember an answered exchange, dropping the oldest past capacity
    pub fn record(&mut self, user: impl Into<String>, bot: impl Into<String>) {
        self.history.push_back(Exchange::new(user, bot));
        while self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }
    }

    /// Plan and record in one step, for callers that can block
    pub fn process_message(&mut self, message: &str) -> (String, Reply) {
        let history = self.history();
        let reply = self.plan_reply(message, &history);
        let user = history_text(message);
        self.record(user.clone(), reply.text.clone());
        (user, reply)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
