use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::language::Language;
use super::platform::Platform;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub default_provider: Option<Platform>,
    #[serde(default)]
    pub default_language: Option<Language>,
    #[serde(default)]
    pub backends: BTreeMap<Platform, BackendConfig>,
}

/// Credentials and knobs for one judge platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub csrf: String,
    #[serde(default)]
    pub csrf_header: Option<String>,
    #[serde(default)]
    pub session: String,
    #[serde(default)]
    pub poll_timeout_secs: Option<u64>,
    #[serde(default)]
    pub purchase_testcases: bool,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl BackendConfig {
    pub fn csrf_header(&self, platform: Platform) -> &str {
        self.csrf_header
            .as_deref()
            .unwrap_or_else(|| platform.default_csrf_header())
    }

    pub fn poll_timeout(&self, platform: Platform) -> Duration {
        self.poll_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| platform.default_poll_timeout())
    }
}

impl UserConfig {
    pub fn backend(&self, platform: Platform) -> Result<&BackendConfig> {
        self.backends.get(&platform).ok_or_else(|| Error::Config {
            message: format!(
                "no authentication token for {} found: try running: coderound login {}",
                platform, platform
            ),
        })
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| Error::Config {
        message: "could not determine the user configuration directory".to_string(),
    })?;
    Ok(base.join("coderound").join("config.json"))
}

pub fn load_config() -> Result<UserConfig> {
    load_config_from(&get_config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| Error::Config {
        message: format!("failed to parse {}: {}", path.display(), e),
    })
}

pub fn save_config_to(path: &Path, config: &UserConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = serde_json::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}
