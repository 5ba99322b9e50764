use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::turn::Turn;

/// One continuous run of the chat, serialized to one history file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(
        alias = "inicio",
        deserialize_with = "crate::parsers::deserializers::deserialize_timestamp"
    )]
    pub start: DateTime<Local>,
    #[serde(
        default,
        alias = "fin",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::parsers::deserializers::deserialize_optional_timestamp"
    )]
    pub end: Option<DateTime<Local>>,
    #[serde(default, alias = "total_mensajes")]
    pub total_messages: usize,
    #[serde(default, alias = "conversaciones")]
    pub turns: Vec<Turn>,
}

/// Aggregate numbers over every stored session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub total_turns: usize,
    pub first_start: Option<DateTime<Local>>,
    pub last_start: Option<DateTime<Local>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            start: Local::now(),
            end: None,
            total_messages: 0,
            turns: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Open a pending turn and return its index
    pub fn begin_turn(&mut self, user: impl Into<String>) -> usize {
        self.turns.push(Turn::pending(user));
        self.turns.len() - 1
    }

    /// Fill in the response of a pending turn
    pub fn fill_response(&mut self, index: usize, bot: impl Into<String>, was_ai: bool) -> Result<()> {
        let len = self.len();
        let turn = self
            .turns
            .get_mut(index)
            .with_context(|| format!("No turn at index {} (session has {})", index, len))?;
        turn.fill_response(bot, was_ai)
    }

    /// Append a turn whose response is already known
    pub fn push_answered(&mut self, user: impl Into<String>, bot: impl Into<String>, was_ai: bool) {
        self.turns.push(Turn::answered(user, bot, was_ai));
    }

    pub fn answered_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.is_answered())
    }

    /// Most recent response produced by the AI
    pub fn last_ai_reply(&self) -> Option<&str> {
        self.turns.iter().rev().find(|t| t.was_ai && t.is_answered()).map(|t| t.bot_text())
    }

    /// Most recent response of any kind
    pub fn last_reply(&self) -> Option<&str> {
        self.turns.iter().rev().find(|t| t.is_answered()).map(|t| t.bot_text())
    }

    /// Stamp end time and message count before the session is written out
    pub fn finish(&mut self) {
        self.end = Some(Local::now());
        self.total_messages = self.turns.len();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStats {
    pub fn from_sessions(sessions: &[Session]) -> Self {
        Self {
            total_sessions: sessions.len(),
            total_turns: sessions.iter().map(|s| s.turns.len()).sum(),
            first_start: sessions.iter().map(|s| s.start).min(),
            last_start: sessions.iter().map(|s| s.start).max(),
        }
    }
}
