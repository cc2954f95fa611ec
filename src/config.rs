//! Core configuration persistence
//!
//! Stores settings in `~/.config/textcore/config.yaml`

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::model::DEFAULT_HISTORY_LIMIT;
use crate::syntax::{language_for_path, PipelineConfig, DEFAULT_DEBOUNCE_MS};

/// Settings for documents and the lexer pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Maximum undo depth; the oldest edits are dropped beyond it
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Delay before a relex job starts, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Extension → language ID overrides (e.g. `h: cpp`)
    #[serde(default)]
    pub extensions: HashMap<String, String>,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            debounce_ms: default_debounce_ms(),
            extensions: HashMap::new(),
        }
    }
}

impl CoreConfig {
    /// Load config from disk, or return defaults if it is missing or invalid
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        // An empty file deserializes to null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Language for `path`: extension overrides first, then built-in detection
    pub fn language_for_path(&self, path: &Path) -> String {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        if let Some(id) = ext.as_deref().and_then(|ext| self.extensions.get(ext)) {
            return id.clone();
        }
        language_for_path(path).to_string()
    }
}

impl From<&CoreConfig> for PipelineConfig {
    fn from(config: &CoreConfig) -> Self {
        PipelineConfig::default().with_debounce(config.debounce())
    }
}
