//! Composer configuration
//!
//! Read from `~/.config/emote-input/config.yaml`:
//!
//! ```yaml
//! process_debounce_ms: 25
//! history_capacity: 50
//! emotes_file: /path/to/emotes.yaml
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Settings the composer and runtime are built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Quiet period before the draft is re-serialized
    #[serde(default = "default_process_debounce_ms")]
    pub process_debounce_ms: u64,

    /// Number of submitted messages kept for recall
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Emote catalog YAML
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotes_file: Option<PathBuf>,
}

fn default_process_debounce_ms() -> u64 {
    25
}

fn default_history_capacity() -> usize {
    crate::history::DEFAULT_CAPACITY
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            process_debounce_ms: default_process_debounce_ms(),
            history_capacity: default_history_capacity(),
            emotes_file: None,
        }
    }
}

/// Errors loading an explicit config file
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_yaml::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config at {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl ComposerConfig {
    /// Load config from the default location, or return defaults if it is
    /// missing or unreadable
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
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Load config from `path`
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // An empty file is a valid, all-defaults config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Catalog path: the configured one, else `emotes.yaml` in the config dir
    pub fn emotes_path(&self) -> Option<PathBuf> {
        self.emotes_file
            .clone()
            .or_else(crate::config_paths::default_emotes_file)
    }
}
