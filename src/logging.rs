//! Tracing subscriber setup

use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "QA_ASSISTANT_LOG";
pub const LOG_FILE: &str = "qa-assistant.log";
const DEFAULT_FILTER: &str = "info";

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to `<dir>/qa-assistant.log`; keeps the alternate screen clean
    File(PathBuf),
}

/// `QA_ASSISTANT_LOG`, then `RUST_LOG`, then `info`
fn filter_directives(app_var: Option<String>, rust_log: Option<String>) -> String {
    app_var
        .filter(|v| !v.trim().is_empty())
        .or(rust_log.filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

fn env_filter() -> EnvFilter {
    let directives = filter_directives(env::var(LOG_ENV_VAR).ok(), env::var("RUST_LOG").ok());
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn open_log_file(dir: &Path) -> Result<fs::File> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

/// Install the global subscriber. Call once, before any other work.
pub fn init(target: LogTarget) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(dir) => {
            let file = open_log_file(&dir)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
    }
    .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_filter_precedence() {
        assert_eq!(filter_directives(Some("debug".into()), Some("warn".into())), "debug");
        assert_eq!(filter_directives(None, Some("warn".into())), "warn");
        assert_eq!(filter_directives(Some("  ".into()), None), "info");
        assert_eq!(filter_directives(None, None), "info");
    }

    #[test]
    fn test_log_file_created_in_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data");
        open_log_file(&nested).unwrap();
        assert!(nested.join(LOG_FILE).exists());
    }
}
