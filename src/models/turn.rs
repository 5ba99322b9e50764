use anyhow::{Result, bail};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One user message / bot response pair.
///
/// A turn is opened as soon as the user submits a message and the response is
/// filled in once, when the worker reports back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub timestamp: DateTime<Local>,
    #[serde(alias = "usuario")]
    pub user: String,
    #[serde(default)]
    pub bot: Option<String>,
    #[serde(default, alias = "fue_ia")]
    pub was_ai: bool,
}

impl Turn {
    /// Turn waiting for its response
    pub fn pending(user: impl Into<String>) -> Self {
        Self { timestamp: Local::now(), user: user.into(), bot: None, was_ai: false }
    }

    /// Turn with its response already known
    pub fn answered(user: impl Into<String>, bot: impl Into<String>, was_ai: bool) -> Self {
        Self { timestamp: Local::now(), user: user.into(), bot: Some(bot.into()), was_ai }
    }

    pub fn is_answered(&self) -> bool {
        self.bot.is_some()
    }

    /// Response text, empty while the turn is pending
    pub fn bot_text(&self) -> &str {
        self.bot.as_deref().unwrap_or("")
    }

    /// Fill in the response. A turn can only be answered once.
    pub fn fill_response(&mut self, bot: impl Into<String>, was_ai: bool) -> Result<()> {
        if self.bot.is_some() {
            bail!("Turn already has a response");
        }
        self.bot = Some(bot.into());
        self.was_ai = was_ai;
        Ok(())
    }

    /// Badge shown next to the bot name in transcripts
    pub fn source_badge(&self) -> &'static str {
        if self.was_ai { "AI" } else { "Local" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_turn_has_no_response() {
        let turn = Turn::pending("hello");
        assert!(!turn.is_answered());
        assert_eq!(turn.bot_text(), "");
        assert!(!turn.was_ai);
    }

    #[test]
    fn test_fill_response_once() {
        let mut turn = Turn::pending("hello");
        turn.fill_response("hi there", true).unwrap();

        assert!(turn.is_answered());
        assert_eq!(turn.bot_text(), "hi there");
        assert!(turn.was_ai);
        assert_eq!(turn.source_badge(), "AI");
    }

    #[test]
    fn test_fill_response_twice_fails() {
        let mut turn = Turn::answered("hello", "hi", false);
        let result = turn.fill_response("again", true);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already has a response"));
        assert_eq!(turn.bot_text(), "hi");
        assert!(!turn.was_ai);
    }

    #[test]
    fn test_turn_legacy_keys() {
        let json = r#"{
            "timestamp": "2025-08-12T10:15:30.123456",
            "usuario": "hola",
            "bot": "¡Hola!",
            "fue_ia": false
        }"#;

        let turn: Turn = serde_json::from_str(json).unwrap();
        assert_eq!(turn.user, "hola");
        assert_eq!(turn.bot_text(), "¡Hola!");
        assert_eq!(turn.source_badge(), "Local");
    }
}
