//! Optional settings file for values that rarely change between notifications

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings loaded from a JSON file; command-line flags take precedence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub icinga_base_url: Option<String>,
    #[serde(default)]
    pub dashboard_base_url: Option<String>,
    #[serde(default)]
    pub dashboard_config_path: Option<PathBuf>,
    #[serde(default)]
    pub dashboard_lookback_hours: Option<u32>,
    #[serde(default)]
    pub emoji: EmojiSettings,
}

/// Emoji overrides per notification type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmojiSettings {
    #[serde(default)]
    pub problem: Option<String>,
    #[serde(default)]
    pub recovery: Option<String>,
    #[serde(default)]
    pub custom: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
}

/// Load settings from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::RepublisherError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let settings: Settings = serde_json::from_str(&content)?;
    Ok(settings)
}
