//! `config.toml` and the AI setup derived from it
//!
//! Every field has a default, so a missing file is fine. A file that exists
//! but does not parse is an error rather than a silent reset.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::ai::gemini::{DEFAULT_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::ai::{GeminiClient, TextGenerator};
use crate::chat::ChatEngine;

pub const CONFIG_FILE: &str = "config.toml";
pub const API_KEY_ENV_VAR: &str = "GOOGLE_API_KEY";
pub const DEFAULT_ASSISTANT_NAME: &str = "QA Assistant";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn default_assistant_name() -> String {
    DEFAULT_ASSISTANT_NAME.to_string()
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_history_window() -> usize {
    3
}

fn default_use_ai() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Answered exchanges rendered into each prompt
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    #[serde(default = "default_use_ai")]
    pub use_ai: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assistant_name: default_assistant_name(),
            model: default_model(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            history_window: default_history_window(),
            use_ai: default_use_ai(),
        }
    }
}

impl AppConfig {
    pub fn path(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE)
    }

    /// Load `path`, or defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&contents, path)
    }

    fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.assistant_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "assistant_name",
                reason: "must not be empty".into(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "model", reason: "must not be empty".into() });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_secs",
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `GOOGLE_API_KEY` from the environment or a `.env` file in the working directory
pub fn api_key() -> Option<String> {
    dotenvy::dotenv().ok();
    env::var(API_KEY_ENV_VAR).ok().map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

/// Engine plus a one-line note on why the AI is off, if it is
pub fn build_engine(config: &AppConfig, api_key: Option<String>) -> (ChatEngine, Option<String>) {
    let (generator, notice): (Option<Arc<dyn TextGenerator>>, Option<String>) = if !config.use_ai {
        (None, Some("AI disabled, using local replies".to_string()))
    } else {
        match api_key {
            None => (
                None,
                Some(format!("{} not set, using local replies only", API_KEY_ENV_VAR)),
            ),
            Some(key) => match GeminiClient::new(key, &config.model, config.request_timeout()) {
                Ok(client) => {
                    info!("Using Gemini model {}", config.model);
                    let generator: Arc<dyn TextGenerator> =
                        Arc::new(client.with_base_url(&config.api_base_url));
                    (Some(generator), None)
                }
                Err(e) => {
                    warn!("Gemini client unavailable: {}", e);
                    (None, Some(format!("AI unavailable ({}), using local replies", e)))
                }
            },
        }
    };

    let engine = ChatEngine::new(&config.assistant_name, generator)
        .with_prompt_window(config.history_window);
    (engine, notice)
}
