//! Session persistence: one pretty-printed JSON file per session

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Local;
use tracing::{info, warn};

use crate::models::{Session, SessionStats};
use crate::parsers::parse_session_file;
use crate::utils::validate_file_name;

const FILE_PREFIX: &str = "conversation_";
const FILE_EXTENSION: &str = "json";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
// Collision suffixes tried before giving up
const MAX_NAME_ATTEMPTS: usize = 100;

/// A session together with the file it was loaded from
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub file_name: String,
    pub session: Session,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).with_context(|| {
                format!("Failed to create history directory: {}", self.dir.display())
            })?;
        }
        Ok(())
    }

    /// First free `conversation_<timestamp>[_n].json` name
    fn next_file_name(&self) -> Result<String> {
        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let base = format!("{}{}", FILE_PREFIX, stamp);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{}.{}", base, FILE_EXTENSION)
            } else {
                format!("{}_{}.{}", base, attempt, FILE_EXTENSION)
            };
            if !self.dir.join(&name).exists() {
                return Ok(name);
            }
        }
        bail!("No free history file name for {} after {} attempts", base, MAX_NAME_ATTEMPTS)
    }

    /// Stamp the session end and write it atomically (temp file + rename).
    /// Returns the path of the new file.
    pub fn save(&self, session: &mut Session) -> Result<PathBuf> {
        self.ensure_dir()?;
        session.finish();

        let file_name = self.next_file_name()?;
        let path = self.dir.join(&file_name);
        let temp = self.dir.join(format!("{}.tmp", file_name));

        let json = serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        fs::write(&temp, json)
            .with_context(|| format!("Failed to write session temp file: {}", temp.display()))?;
        fs::rename(&temp, &path)
            .with_context(|| format!("Failed to rename session temp file: {}", temp.display()))?;

        info!("Saved session {} ({} turns) to {}", session.id, session.len(), path.display());
        Ok(path)
    }

    /// Load every session, newest first.
    ///
    /// Unreadable files are skipped with a warning. More than half of the
    /// files failing is treated as a broken history directory.
    pub fn list(&self) -> Result<Vec<StoredSession>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read history directory: {}", self.dir.display()))?;

        let mut sessions = Vec::new();
        let mut total = 0;
        let mut failed = 0;

        for entry in entries {
            let entry = entry.context("Failed to read history directory entry")?;
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != FILE_EXTENSION) {
                continue;
            }

            total += 1;
            match parse_session_file(&path) {
                Ok(session) => sessions.push(StoredSession {
                    file_name: entry.file_name().to_string_lossy().to_string(),
                    session,
                }),
                Err(e) => {
                    warn!("Skipping unreadable session file {}: {:#}", path.display(), e);
                    failed += 1;
                }
            }
        }

        if total > 0 {
            let failure_rate = failed as f64 / total as f64;
            if failure_rate > 0.5 {
                bail!(
                    "Too many unreadable session files: {} of {} failed ({:.1}%)",
                    failed,
                    total,
                    failure_rate * 100.0
                );
            }
        }

        sessions.sort_by(|a, b| b.session.start.cmp(&a.session.start));
        Ok(sessions)
    }

    /// Load one session by bare file name
    pub fn load(&self, file_name: &str) -> Result<Session> {
        validate_file_name(file_name)?;
        let path = self.dir.join(file_name);
        if !path.is_file() {
            bail!("Session file not found: {}", file_name);
        }
        parse_session_file(&path)
    }

    pub fn stats(&self) -> Result<SessionStats> {
        let sessions: Vec<Session> = self.list()?.into_iter().map(|s| s.session).collect();
        Ok(SessionStats::from_sessions(&sessions))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn session_with_turns(n: usize) -> Session {
        let mut session = Session::new();
        for i in 0..n {
            session.push_answered(format!("question {i}"), format!("answer {i}"), i % 2 == 0);
        }
        session
    }

    #[test]
    fn test_save_then_load_keeps_turn_count() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("history"));
        let mut session = session_with_turns(7);

        let path = store.save(&mut session).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("conversation_"));
        assert!(name.ends_with(".json"));

        let loaded = store.load(&name).unwrap();
        assert_eq!(loaded.turns.len(), 7);
        assert_eq!(loaded.total_messages, 7);
        assert!(loaded.end.is_some());
    }

    #[test]
    fn test_save_same_second_gets_suffix() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());

        let first = store.save(&mut session_with_turns(1)).unwrap();
        let second = store.save(&mut session_with_turns(1)).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        store.save(&mut session_with_turns(2)).unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("nope"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());

        let mut older = session_with_turns(1);
        older.start = Local::now() - chrono::Duration::days(2);
        store.save(&mut older).unwrap();
        let mut newer = session_with_turns(2);
        store.save(&mut newer).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed[0].session.id, newer.id);
        assert_eq!(listed[1].session.id, older.id);
    }

    #[test]
    fn test_list_skips_minority_of_bad_files() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        store.save(&mut session_with_turns(1)).unwrap();
        store.save(&mut session_with_turns(1)).unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_list_fails_when_most_files_are_bad() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        store.save(&mut session_with_turns(1)).unwrap();
        fs::write(dir.path().join("a.json"), "{").unwrap();
        fs::write(dir.path().join("b.json"), "[]").unwrap();

        let err = store.list().unwrap_err();
        assert!(err.to_string().contains("Too many unreadable session files"));
    }

    #[test]
    fn test_load_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());

        assert!(store.load("../etc/passwd").is_err());
        assert!(store.load("..").is_err());
        assert!(store.load("sub/file.json").is_err());
    }

    #[test]
    fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        let err = store.load("conversation_20200101_000000.json").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_stats() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        store.save(&mut session_with_turns(3)).unwrap();
        store.save(&mut session_with_turns(4)).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_turns, 7);
        assert!(stats.first_start <= stats.last_start);
    }
}
