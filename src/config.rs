use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;
use serde::Deserialize;

use crate::prompt::{Language, LengthTier, OutputMode};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub default_mode: Option<OutputMode>,
    pub default_length: Option<LengthTier>,
    pub default_language: Option<Language>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub caption_lang: Option<String>,
}

impl Config {
    /// Load config from ~/.config/watchless/config.toml if it exists
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("watchless")
        .join("config.toml")
}
