/// Security-focused integration tests
///
/// These tests verify security boundaries: path traversal, resource limits, terminal injection
mod common;

use std::fs;
use std::sync::Arc;

use common::{DataDirBuilder, SessionBuilder};
use qa_assistant::ai::{GenerationError, TextGenerator};
use qa_assistant::attachments::extract_text;
use qa_assistant::chat::ChatEngine;
use qa_assistant::clipboard::validate_clipboard_text;
use qa_assistant::history::SessionStore;
use qa_assistant::notion::NotionConfig;
use qa_assistant::utils::MAX_FILE_SIZE_BYTES;

struct ScriptedGenerator(&'static str);

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.0.to_string())
    }
}

fn write_oversized(path: &std::path::Path) {
    let file = fs::File::create(path).unwrap();
    // Sparse file: reported size is past the limit without writing 10MB
    file.set_len(MAX_FILE_SIZE_BYTES + 1).unwrap();
}

#[test]
fn test_security_load_rejects_path_traversal() {
    let data_dir =
        DataDirBuilder::new().with_session("conversation_20250812_090000.json", &SessionBuilder::new()).build();
    fs::write(data_dir.path().join("secret.json"), r#"{"start":"2025-08-12T09:00:00"}"#).unwrap();

    let store = SessionStore::new(data_dir.path().join("history"));
    for name in ["../secret.json", "..", ".", "/etc/passwd", "history\\..\\secret.json", "", "  "] {
        assert!(store.load(name).is_err(), "{name:?} should be rejected");
    }
    assert!(store.load("conversation_20250812_090000.json").is_ok());
}

#[test]
#[cfg(unix)]
fn test_security_oversized_session_file_skipped() {
    let data_dir = DataDirBuilder::new()
        .with_session("conversation_20250812_090000.json", &SessionBuilder::new())
        .build();
    write_oversized(&data_dir.path().join("history").join("conversation_20250812_100000.json"));

    let store = SessionStore::new(data_dir.path().join("history"));
    // One of two files failing is at the threshold, not past it
    let sessions = store.list().unwrap();
    assert_eq!(sessions.len(), 1);

    let err = store.load("conversation_20250812_100000.json").unwrap_err();
    assert!(format!("{err:#}").contains("File too large"));
}

#[test]
fn test_security_mostly_corrupt_history_is_an_error() {
    let data_dir = DataDirBuilder::new()
        .with_session("conversation_20250812_090000.json", &SessionBuilder::new())
        .with_raw_session("conversation_20250812_100000.json", "{")
        .with_raw_session("conversation_20250812_110000.json", "[]")
        .build();

    let store = SessionStore::new(data_dir.path().join("history"));
    let err = store.list().unwrap_err();
    assert!(err.to_string().contains("Too many unreadable session files"));
}

#[test]
#[cfg(unix)]
fn test_security_oversized_attachment_not_read() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("huge.txt");
    write_oversized(&file);

    let text = extract_text(&file);
    assert!(text.starts_with("❌ Error reading huge.txt"), "got {text:?}");
}

#[test]
fn test_security_ai_reply_escape_sequences_stripped() {
    let generator: Arc<dyn TextGenerator> =
        Arc::new(ScriptedGenerator("\x1b]0;owned\x07\x1b[2JTest plan:\n\x1b[31m1. Log in\x1b[0m\x08"));
    let engine = ChatEngine::new("QA Assistant", Some(generator));

    let reply = engine.plan_reply("write a test plan for checkout", &[]);
    assert!(reply.was_ai);
    assert_eq!(reply.text, "Test plan:\n1. Log in");
}

#[test]
fn test_security_notion_id_must_be_hex() {
    for input in ["../../etc/passwd", "javascript:alert(1)", "not-an-id", ""] {
        assert!(NotionConfig::new(input, None).is_err(), "{input:?} should be rejected");
    }
}

#[test]
fn test_security_clipboard_size_limit() {
    assert!(validate_clipboard_text("").is_err());
    assert!(validate_clipboard_text("[CP-1] ok").is_ok());

    let huge = "a".repeat(10 * 1024 * 1024 + 1);
    assert!(validate_clipboard_text(&huge).is_err());
}
