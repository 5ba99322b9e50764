use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const NOTION_CONFIG_FILE: &str = "notion_config.json";

const DATABASE_ID_LEN: usize = 32;

/// Target board for the clipboard export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotionConfig {
    #[serde(default)]
    pub database_id: String,
    #[serde(default)]
    pub workspace_name: String,
    #[serde(default, alias = "configurado")]
    pub configured: bool,
}

impl NotionConfig {
    /// Configured board for `database_id`, which may be a raw id or a URL
    pub fn new(database_id: &str, workspace_name: Option<&str>) -> Result<Self> {
        Ok(Self {
            database_id: database_id_from_url(database_id)?,
            workspace_name: workspace_name.unwrap_or_default().trim().to_string(),
            configured: true,
        })
    }

    pub fn path(config_dir: &Path) -> PathBuf {
        config_dir.join(NOTION_CONFIG_FILE)
    }

    /// Load from `config_dir`. A missing or unreadable file means "not configured".
    pub fn load(config_dir: &Path) -> Self {
        let path = Self::path(config_dir);
        if !path.exists() {
            return Self::default();
        }

        match fs::read(&path)
            .context("Failed to read Notion config")
            .and_then(|bytes| serde_json::from_slice(&bytes).context("Failed to parse Notion config"))
        {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring Notion config {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, config_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(config_dir).with_context(|| {
            format!("Failed to create config directory: {}", config_dir.display())
        })?;

        let path = Self::path(config_dir);
        let temp = config_dir.join(format!("{}.tmp", NOTION_CONFIG_FILE));
        let json = serde_json::to_string_pretty(self).context("Failed to serialize Notion config")?;

        fs::write(&temp, json).context("Failed to write Notion config temp file")?;
        fs::rename(&temp, &path).context("Failed to rename Notion config temp file")?;

        info!("Saved Notion config for database {}", self.database_id);
        Ok(path)
    }

    /// Remove the stored config. Returns whether a file was removed.
    pub fn clear(config_dir: &Path) -> Result<bool> {
        let path = Self::path(config_dir);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove Notion config: {}", path.display()))?;
        info!("Cleared Notion config");
        Ok(true)
    }

    pub fn is_configured(&self) -> bool {
        self.configured && !self.database_id.trim().is_empty()
    }

    pub fn board_url(&self) -> String {
        format!("https://notion.so/{}", self.database_id)
    }
}

fn is_database_id(candidate: &str) -> bool {
    candidate.len() == DATABASE_ID_LEN && candidate.chars().all(|c| c.is_ascii_hexdigit())
}

/// Pull the 32-hex database id out of a raw id, a dashed UUID or a notion.so URL.
///
/// Page URLs end in `Title-Words-<id>`, optionally followed by `?v=...`.
pub fn database_id_from_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let without_query = trimmed.split(['?', '#']).next().unwrap_or_default();
    let segment = without_query.trim_end_matches('/').rsplit('/').next().unwrap_or_default();

    let compact = segment.replace('-', "");
    if is_database_id(&compact) {
        return Ok(compact.to_lowercase());
    }

    if let Some(tail) = segment.rsplit('-').next()
        && is_database_id(tail)
    {
        return Ok(tail.to_lowercase());
    }

    bail!("No 32-character hexadecimal Notion database id found in {:?}", trimmed)
}
