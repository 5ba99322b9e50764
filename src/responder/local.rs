//! Pattern-based replies used when the AI is unavailable or not needed.

use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use rand::Rng;
use rand::seq::SliceRandom;
use regex::{Regex, RegexBuilder};

/// Greetings, farewells, thanks and identity questions are always answered locally
static SMALL_TALK: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(hello|hi|hey|good morning|good afternoon|good evening|greetings|hola|buenos dias|buenas tardes|buenas noches|saludos)\b",
        r"\b(goodbye|bye|see you|adios|chao|hasta luego|nos vemos)\b",
        r"\b(thanks|thank you|many thanks|gracias|muchas gracias|te agradezco)\b",
        r"\b(who are you|what is your name|your name|quien eres|como te llamas|tu nombre)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid small talk regex"))
    .collect()
});

const DEFAULT_REPLIES: &[&str] = &[
    "Interesting... can you tell me more about that?",
    "I'm not sure how to answer that. Could you rephrase the question?",
    "Hmm, I don't have a specific answer for that. Is there anything else I can help you with?",
    "That's an interesting question. Could you be more specific?",
    "Sorry, I don't fully understand. Can you explain it another way?",
];

#[derive(Debug, Clone)]
struct LocalPattern {
    source: String,
    regex: Regex,
    replies: Vec<String>,
}

/// Ordered table of phrase patterns and canned replies.
///
/// The first matching pattern wins and one of its replies is picked uniformly
/// at random. Messages that match nothing get a random default reply.
#[derive(Debug, Clone)]
pub struct LocalResponder {
    name: String,
    patterns: Vec<LocalPattern>,
    defaults: Vec<String>,
}

impl LocalResponder {
    /// Responder with the built-in pattern table, replies signed with `name`
    pub fn new(name: &str) -> Self {
        let mut responder = Self {
            name: name.to_string(),
            patterns: Vec::new(),
            defaults: DEFAULT_REPLIES.iter().map(|s| s.to_string()).collect(),
        };

        for (pattern, replies) in builtin_patterns(name) {
            // Built-in patterns are literals and always compile
            if let Err(e) = responder.add_pattern(pattern, replies) {
                tracing::error!("Skipping built-in pattern {:?}: {}", pattern, e);
            }
        }
        responder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    /// Append a pattern, or replace the replies of an existing identical pattern
    /// in place. Matching is case-insensitive.
    pub fn add_pattern<S: Into<String>>(&mut self, pattern: &str, replies: Vec<S>) -> Result<()> {
        let replies: Vec<String> = replies.into_iter().map(Into::into).collect();
        if replies.is_empty() {
            bail!("Pattern {:?} needs at least one reply", pattern);
        }

        if let Some(existing) = self.patterns.iter_mut().find(|p| p.source == pattern) {
            existing.replies = replies;
            return Ok(());
        }

        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("Invalid reply pattern: {}", pattern))?;
        self.patterns.push(LocalPattern { source: pattern.to_string(), regex, replies });
        Ok(())
    }

    /// Replies of the first pattern matching `text`, if any
    pub fn matching_replies(&self, text: &str) -> Option<&[String]> {
        let cleaned = text.trim().to_lowercase();
        self.patterns.iter().find(|p| p.regex.is_match(&cleaned)).map(|p| p.replies.as_slice())
    }

    pub fn respond_with<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> String {
        let pool = self.matching_replies(text).unwrap_or(self.defaults.as_slice());
        pool.choose(rng).cloned().unwrap_or_default()
    }

    pub fn respond(&self, text: &str) -> String {
        self.respond_with(text, &mut rand::thread_rng())
    }

    /// Whether the message is small talk that never needs the AI
    pub fn is_small_talk(text: &str) -> bool {
        let cleaned = text.trim().to_lowercase();
        SMALL_TALK.iter().any(|re| re.is_match(&cleaned))
    }
}

/// Rough category of attached content, used by the offline attachment reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Requirements,
    Code,
    Data,
    Documentation,
    General,
}

impl ContentKind {
    pub fn classify(content: &str) -> Self {
        let lower = content.to_lowercase();
        let has_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if has_any(&["requirement", "use case", "user story", "requisito", "caso de uso", "funcionalidad"]) {
            Self::Requirements
        } else if has_any(&["def ", "class ", "function", "import ", "fn ", "public class"]) {
            Self::Code
        } else if has_any(&["json", "xml", "csv", "data", "config"]) {
            Self::Data
        } else if has_any(&["manual", "guide", "tutorial", "procedure", "documentation", "guía"]) {
            Self::Documentation
        } else {
            Self::General
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Requirements => "They look like requirements, a good source for test cases.",
            Self::Code => "They look like source code.",
            Self::Data => "They look like data or configuration.",
            Self::Documentation => "They look like technical documentation.",
            Self::General => "",
        }
    }
}

/// Reply for a message with attachments when the AI is unavailable
pub fn offline_attachment_reply(attached_text: &str) -> String {
    let mut reply = String::from(
        "I received your attached files. I don't have AI access right now, but I can see you \
         attached documents. A full analysis or test case generation needs the AI connection.",
    );
    let hint = ContentKind::classify(attached_text).describe();
    if !hint.is_empty() {
        reply.push(' ');
        reply.push_str(hint);
    }
    reply.push_str(" Is there anything specific about the files you'd like to discuss?");
    reply
}

fn builtin_patterns(name: &str) -> Vec<(&'static str, Vec<String>)> {
    vec![
        (
            r"\b(hello|hi|hey|good morning|good afternoon|good evening|greetings|hola|buenos dias|buenas tardes|buenas noches|saludos)\b",
            vec![
                format!("Hello! I'm {name}, how can I help you?"),
                format!("Greetings! I'm {name}, what do you need?"),
                format!("Hi! How are you? I'm {name}"),
            ],
        ),
        (
            r"who are you|what is your name|your name|quien eres|como te llamas|tu nombre",
            vec![
                format!("I'm {name}, a chatbot built to help you."),
                format!("My name is {name} and I'm here to assist you."),
                format!("I'm {name}, your virtual assistant."),
            ],
        ),
        (
            r"how are you|how's it going|como estas|que tal|como te encuentras",
            vec![
                "I'm doing great, thanks for asking!".to_string(),
                "Perfect! Ready to help.".to_string(),
                "Excellent! And how are you?".to_string(),
            ],
        ),
        (
            r"\bhelp\b|what can you do|features|ayuda|que puedes hacer|funciones",
            vec![
                "I can answer basic questions, chat with you and talk about many topics.".to_string(),
                "I'm here to chat and answer your questions. Ask me anything!".to_string(),
                "I can answer questions, chat and help you with basic information.".to_string(),
            ],
        ),
        (
            r"what time is it|\btime\b|que hora es|\bhora\b",
            vec![
                "Sorry, I don't have access to the current time right now.".to_string(),
                "I can't check the time right now, but your device can.".to_string(),
            ],
        ),
        (
            r"\b(goodbye|bye|see you|adios|chao|hasta luego|nos vemos)\b",
            vec![
                "See you later! It was a pleasure to help.".to_string(),
                "Goodbye! Have a great day.".to_string(),
                "See you! Come back whenever you need help.".to_string(),
            ],
        ),
        (
            r"thanks|thank you|gracias|te agradezco",
            vec![
                "You're welcome! I'm here to help.".to_string(),
                "Happy to help!".to_string(),
                "That's what I'm here for!".to_string(),
            ],
        ),
        (
            r"how old|your age|tu edad|cuantos anos",
            vec![
                "I'm a computer program, so I don't have an age like humans do.".to_string(),
                "I'm software, so technically I was born when I was programmed!".to_string(),
            ],
        ),
        (
            r"\bfiles?\b|\bdocuments?\b|\bimages?\b|analysis|archivo|documento|imagen|analisis",
            vec![
                "I can help you analyze files and documents. What kind of analysis do you need?".to_string(),
                "I'm ready to review documents. Do you want a summary, an analysis or something specific?".to_string(),
                "Need me to analyze a file? Attach it and tell me what to do!".to_string(),
            ],
        ),
        (
            r"test cases|testing|casos de prueba",
            vec![
                "Perfect! I can generate detailed test cases from documents.".to_string(),
                "Test cases are my specialty. Attach your documentation and I'll write them.".to_string(),
                "Do you have requirement documents? I can create test cases from them.".to_string(),
            ],
        ),
        (
            r"user manual|user guide|manual de usuario|manual usuario|guia de usuario|guia usuario",
            vec![
                "Excellent! I can write user manuals following a fixed structure.".to_string(),
                "User documentation is my specialty. Attach your information and I'll write the manual.".to_string(),
                "Do you have information about the system? I can create a complete user manual.".to_string(),
            ],
        ),
        (
            r"summary|summari[sz]e|resumen|resumir",
            vec![
                "I can write clear and concise summaries of your documents.".to_string(),
                "Want me to summarize a document? Attach it!".to_string(),
                "I specialize in summarizing technical and business documents.".to_string(),
            ],
        ),
        (
            r"python|programming|\bcode\b|programacion|codigo",
            vec![
                "I love Python! It's a very versatile language.".to_string(),
                "Python is great for beginners and experts alike.".to_string(),
                "Programming is fascinating. What project are you working on?".to_string(),
            ],
        ),
        (
            r"weather|temperature|\brain\b|clima|temperatura|lluvia",
            vec![
                "I don't have access to real-time weather information.".to_string(),
                "I recommend checking a weather app for up-to-date information.".to_string(),
                "Is it a nice day where you are?".to_string(),
            ],
        ),
        (
            r"\bqa\b|quality assurance",
            vec![
                "Excellent! I can help you generate detailed test cases.".to_string(),
                "Test cases are fundamental to software quality.".to_string(),
                "Do you have a requirements document you'd like me to analyze for test cases?".to_string(),
            ],
        ),
    ]
}
