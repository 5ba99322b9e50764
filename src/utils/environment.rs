use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const HOME_ENV_VAR: &str = "QA_ASSISTANT_HOME";
const APP_DIR_NAME: &str = "qa-assistant";

/// Directory holding history, logs and the Notion config.
///
/// `$QA_ASSISTANT_HOME` wins when set, otherwise the platform data dir.
pub fn get_data_dir() -> Result<PathBuf> {
    data_dir_from(env::var_os(HOME_ENV_VAR).map(PathBuf::from))
}

fn data_dir_from(override_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir);
    }
    let base = dirs::data_dir().context("Could not determine the platform data directory")?;
    Ok(base.join(APP_DIR_NAME))
}

/// Directory holding `config.toml`. Shares `$QA_ASSISTANT_HOME` when set.
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(HOME_ENV_VAR).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let base = dirs::config_dir().context("Could not determine the platform config directory")?;
    Ok(base.join(APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_override() {
        let dir = data_dir_from(Some(PathBuf::from("/tmp/qa-home"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/qa-home"));
    }

    #[test]
    fn test_data_dir_empty_override_falls_back() {
        // Platform dir may be missing in minimal containers
        if let Ok(dir) = data_dir_from(Some(PathBuf::new())) {
            assert!(dir.ends_with(APP_DIR_NAME));
        }
    }

    #[test]
    fn test_data_dir_default_ends_with_app_name() {
        if let Ok(dir) = data_dir_from(None) {
            assert!(dir.ends_with(APP_DIR_NAME));
        }
    }
}
