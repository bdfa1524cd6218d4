use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::USER_AGENT;

// Persisted settings for the command-line host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub download_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            timeout_secs: 30,
            download_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    // Load the config file, or defaults if there is none
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        if contents.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    // Configured directory, then the user's download folder, then the working directory
    pub fn resolve_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("net", "sudomemo", "sudomemo")
        .map(|dirs| dirs.config_dir().join("config.json"))
}
