use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Session;
use crate::utils::read_bounded;

/// Parse one session JSON file, current or legacy key layout
pub fn parse_session_file(path: &Path) -> Result<Session> {
    let bytes = read_bounded(path)?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse session file: {}", path.display()))
}
