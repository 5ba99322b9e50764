//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builder for a data directory laid out the way the binary expects:
/// `history/` for session files, `notion_config.json` and `config.toml` at the root
pub struct DataDirBuilder {
    temp_dir: TempDir,
}

impl DataDirBuilder {
    /// Create a new builder with an empty data directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the data directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn history_dir(&self) -> PathBuf {
        let dir = self.temp_dir.path().join("history");
        fs::create_dir_all(&dir).expect("Failed to create history dir");
        dir
    }

    /// Add a session file with raw content
    pub fn with_raw_session(self, file_name: &str, content: &str) -> Self {
        let path = self.history_dir().join(file_name);
        fs::write(path, content).expect("Failed to write session file");
        self
    }

    /// Add a session file built programmatically
    pub fn with_session(self, file_name: &str, session: &SessionBuilder) -> Self {
        let content = session.to_json();
        self.with_raw_session(file_name, &content)
    }

    /// Add a config.toml with the given content
    pub fn with_config(self, content: &str) -> Self {
        fs::write(self.temp_dir.path().join("config.toml"), content)
            .expect("Failed to write config.toml");
        self
    }

    /// Add a notion_config.json pointing at the given database
    pub fn with_notion(self, database_id: &str) -> Self {
        let content = format!(
            r#"{{"database_id":"{}","workspace_name":"QA","configured":true}}"#,
            database_id
        );
        fs::write(self.temp_dir.path().join("notion_config.json"), content)
            .expect("Failed to write notion config");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for DataDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for session JSON files
pub struct SessionBuilder {
    start: String,
    end: Option<String>,
    turns: Vec<TurnBuilder>,
    legacy_keys: bool,
}

impl SessionBuilder {
    /// Create a session starting at a fixed time with no turns
    pub fn new() -> Self {
        Self {
            start: "2025-08-12T09:00:00".to_string(),
            end: None,
            turns: Vec::new(),
            legacy_keys: false,
        }
    }

    /// Set the start timestamp (naive ISO-8601)
    pub fn start(mut self, start: &str) -> Self {
        self.start = start.to_string();
        self
    }

    /// Set the end timestamp (naive ISO-8601)
    pub fn end(mut self, end: &str) -> Self {
        self.end = Some(end.to_string());
        self
    }

    /// Add a turn
    pub fn with_turn(mut self, turn: TurnBuilder) -> Self {
        self.turns.push(turn);
        self
    }

    /// Write the Spanish key names older history files use
    pub fn legacy_keys(mut self) -> Self {
        self.legacy_keys = true;
        self
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        let (start_key, end_key, total_key, turns_key) = if self.legacy_keys {
            ("inicio", "fin", "total_mensajes", "conversaciones")
        } else {
            ("start", "end", "total_messages", "turns")
        };

        let mut fields = vec![format!(r#""{}":"{}""#, start_key, self.start)];
        if let Some(end) = &self.end {
            fields.push(format!(r#""{}":"{}""#, end_key, end));
        }
        fields.push(format!(r#""{}":{}"#, total_key, self.turns.len()));

        let turns: Vec<String> = self.turns.iter().map(|t| t.to_json(self.legacy_keys)).collect();
        fields.push(format!(r#""{}":[{}]"#, turns_key, turns.join(",")));

        format!("{{{}}}", fields.join(","))
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a single turn inside a session file
pub struct TurnBuilder {
    timestamp: String,
    user: String,
    bot: Option<String>,
    was_ai: bool,
}

impl TurnBuilder {
    /// Create an answered local turn with default text
    pub fn new() -> Self {
        Self {
            timestamp: "2025-08-12T09:01:00".to_string(),
            user: "hello".to_string(),
            bot: Some("Hi! How can I help you with QA today?".to_string()),
            was_ai: false,
        }
    }

    /// Set the timestamp (naive ISO-8601)
    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = timestamp.to_string();
        self
    }

    /// Set the user message
    pub fn user(mut self, user: &str) -> Self {
        self.user = user.to_string();
        self
    }

    /// Set the bot response
    pub fn bot(mut self, bot: &str) -> Self {
        self.bot = Some(bot.to_string());
        self
    }

    /// Leave the turn unanswered
    pub fn pending(mut self) -> Self {
        self.bot = None;
        self
    }

    /// Mark the response as AI generated
    pub fn ai(mut self) -> Self {
        self.was_ai = true;
        self
    }

    fn to_json(&self, legacy_keys: bool) -> String {
        let (user_key, ai_key) = if legacy_keys { ("usuario", "fue_ia") } else { ("user", "was_ai") };
        let bot = match &self.bot {
            Some(bot) => serde_json::to_string(bot).expect("Failed to encode bot text"),
            None => "null".to_string(),
        };
        let user = serde_json::to_string(&self.user).expect("Failed to encode user text");

        format!(
            r#"{{"timestamp":"{}","{}":{},"bot":{},"{}":{}}}"#,
            self.timestamp, user_key, user, bot, ai_key, self.was_ai
        )
    }
}

impl Default for TurnBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Generated reply text holding two complete cases
pub const TWO_CASES: &str = "Here are the cases:

[CP-001] Login with valid credentials
📄 Description
Verify that a user can log in with valid credentials

📅 Created
12/08/2025

🔢 ID No.
1

🗂 Module
Authentication

🚨 Priority
High

🔄 Status
Pending

📌 Project
Login System

🎯 Expected result
The user lands on the dashboard

Comments
Critical path

Steps:
1. Open the login page
2. Enter a valid user
3. Click Sign in

---

[CP-002] Login with a wrong password
📄 Description
Verify that a wrong password is rejected

📅 Created
12/08/2025

🔢 ID No.
2

🗂 Module
Authentication

🚨 Priority
Medium

🔄 Status
Pending

📌 Project
Login System

🎯 Expected result
An error message is shown

Comments
None

Steps:
1. Open the login page
2. Enter a wrong password

---
";

/// Data directory with two sessions, one modern and one legacy
pub fn realistic_data_dir() -> TempDir {
    DataDirBuilder::new()
        .with_session(
            "conversation_20250812_090000.json",
            &SessionBuilder::new()
                .start("2025-08-12T09:00:00")
                .end("2025-08-12T09:10:00")
                .with_turn(TurnBuilder::new().user("hello"))
                .with_turn(
                    TurnBuilder::new()
                        .timestamp("2025-08-12T09:02:00")
                        .user("generate test cases for login")
                        .bot(TWO_CASES)
                        .ai(),
                ),
        )
        .with_session(
            "conversacion_20250801_150000.json",
            &SessionBuilder::new()
                .start("2025-08-01T15:00:00.123456")
                .legacy_keys()
                .with_turn(
                    TurnBuilder::new()
                        .timestamp("2025-08-01T15:01:00")
                        .user("hola")
                        .bot("¡Hola! ¿En qué te ayudo?"),
                ),
        )
        .build()
}
