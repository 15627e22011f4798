use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::model::TextModel;

pub const DEFAULT_ENDPOINT: &str = "https://text-origin.pollinations.ai/openai";
pub const DEFAULT_REFERRER: &str = "pppp";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub endpoint: Option<String>,
    pub default_model: Option<String>,
    pub referrer: Option<String>,
    /// Where the key/value store lives; defaults next to this file
    pub storage_path: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            endpoint: None,
            default_model: Some(TextModel::default().as_str().to_string()),
            referrer: None,
            storage_path: None,
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    pub fn save_default_model(model: &str) -> Result<()> {
        let mut config = Self::load().unwrap_or_else(|_| Self::new());
        config.default_model = Some(model.to_string());
        config.save()
    }

    /// Endpoint URL; `MATHSKILLS_ENDPOINT` wins over the file.
    pub fn endpoint(&self) -> String {
        std::env::var("MATHSKILLS_ENDPOINT")
            .ok()
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    /// Model id; `MATHSKILLS_MODEL` wins over the file.
    pub fn model(&self) -> String {
        std::env::var("MATHSKILLS_MODEL")
            .ok()
            .or_else(|| self.default_model.clone())
            .unwrap_or_else(|| TextModel::default().as_str().to_string())
    }

    pub fn referrer(&self) -> String {
        self.referrer
            .clone()
            .unwrap_or_else(|| DEFAULT_REFERRER.to_string())
    }

    pub fn storage_path(&self) -> Result<PathBuf> {
        match &self.storage_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("storage.json")),
        }
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("mathskills"))
    }
}
