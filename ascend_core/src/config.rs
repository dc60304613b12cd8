//! Configuration file support for Ascend.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/ascend/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub coach: CoachConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Guided session configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Days of history reviewed for progression hints
    #[serde(default = "default_history_window_days")]
    pub history_window_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_window_days: default_history_window_days(),
        }
    }
}

/// Coach payload configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoachConfig {
    /// Completion models, tried in order by the chat proxy
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Number of recent workouts included in the coach context
    #[serde(default = "default_recent_workouts")]
    pub recent_workouts: usize,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            models: default_models(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            recent_workouts: default_recent_workouts(),
        }
    }
}

// Default value functions
fn home_dir_or_cwd() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir_or_cwd().join(".local/share"));
    base.join("ascend")
}

fn default_history_window_days() -> i64 {
    7
}

fn default_models() -> Vec<String> {
    vec![
        "llama-3.1-8b-instant".into(),
        "gemma2-9b-it".into(),
        "llama-3.3-70b-versatile".into(),
    ]
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

fn default_recent_workouts() -> usize {
    10
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir_or_cwd().join(".config"));
        base.join("ascend").join("config.toml")
    }

    /// Reject values the rest of the system can't work with
    pub fn validate(&self) -> Result<()> {
        if self.session.history_window_days < 0 {
            return Err(Error::Config(format!(
                "session.history_window_days must not be negative (got {})",
                self.session.history_window_days
            )));
        }
        if self.coach.models.is_empty() {
            return Err(Error::Config("coach.models must list at least one model".into()));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
