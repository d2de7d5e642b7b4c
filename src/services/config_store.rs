// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::{Language, ModelConfigOverrides, ModelVariant};

const CONFIG_DIR_NAME: &str = "plagai-scanner";
const BACKUP_KEEP: usize = 10;
/// Key under which the Gemini credential is stored in `apiKeys`
pub const GEMINI_KEY_NAME: &str = "gemini";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub model: ModelVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_config: Option<ModelConfigOverrides>,
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
}

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), String> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("Failed to create config dir: {}", e))
    }

    /// Load configuration from file
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), String> {
        self.ensure_dir()?;

        if self.config_file.exists() {
            self.create_backup()?;
        }

        let mut config = config.clone();
        if config.version.is_empty() {
            config.version = env!("CARGO_PKG_VERSION").to_string();
        }

        let content = serde_json::to_string_pretty(&config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&self.config_file, content)
            .map_err(|e| format!("Failed to write config: {}", e))?;
        info!("[CONFIG] saved {}", self.config_file.display());
        Ok(())
    }

    /// Create a backup of current config
    fn create_backup(&self) -> Result<(), String> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir)
            .map_err(|e| format!("Failed to create backup dir: {}", e))?;

        // Sub-second suffix keeps rapid successive saves from overwriting each other
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S_%3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file)
            .map_err(|e| format!("Failed to create backup: {}", e))?;

        self.cleanup_old_backups(&backup_dir, BACKUP_KEEP)
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), String> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(|e| format!("Failed to read backup dir: {}", e))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Timestamped names sort oldest first
        entries.sort_by_key(|e| e.file_name());

        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }

    /// Get the stored Gemini API key; blank values count as absent
    pub fn get_api_key(&self) -> Result<Option<String>, String> {
        let config = self.load()?;
        Ok(config
            .api_keys
            .get(GEMINI_KEY_NAME)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty()))
    }

    /// Store the Gemini API key in config file
    pub fn set_api_key(&self, key: &str) -> Result<(), String> {
        let mut config = self.load()?;
        config
            .api_keys
            .insert(GEMINI_KEY_NAME.to_string(), key.trim().to_string());
        self.save(&config)
    }

    /// Delete the Gemini API key from config file
    pub fn delete_api_key(&self) -> Result<(), String> {
        let mut config = self.load()?;
        config.api_keys.remove(GEMINI_KEY_NAME);
        self.save(&config)
    }

    pub fn set_language(&self, language: Language) -> Result<(), String> {
        let mut config = self.load()?;
        config.language = language;
        self.save(&config)
    }

    pub fn set_model(&self, model: ModelVariant) -> Result<(), String> {
        let mut config = self.load()?;
        config.model = model;
        self.save(&config)
    }

    /// Set the Gemini base URL; an empty value clears it
    pub fn set_base_url(&self, url: &str) -> Result<(), String> {
        let mut config = self.load()?;
        let url = url.trim();
        config.gemini_base_url = if url.is_empty() {
            None
        } else {
            Some(url.to_string())
        };
        self.save(&config)
    }
}
