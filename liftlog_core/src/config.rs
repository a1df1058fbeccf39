//! Configuration file support for liftlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftlog/config.toml`.

use crate::types::{DEFAULT_CYCLE, DEFAULT_REST_DAYS_PER_WEEK, MAX_REST_DAYS_PER_WEEK};
use crate::{Error, Result, TrackerState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub tracker: TrackerConfig,
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

/// Rotation defaults and history windows
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Rotation used to create the state on first run
    #[serde(default = "default_cycle")]
    pub default_cycle: Vec<String>,

    /// Rest target used to create the state on first run
    #[serde(default = "default_rest_days_per_week")]
    pub default_rest_days_per_week: u8,

    /// Number of recent entries scanned for the streak
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Number of recent entries scanned for the week view
    #[serde(default = "default_week_window")]
    pub week_window: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_cycle: default_cycle(),
            default_rest_days_per_week: default_rest_days_per_week(),
            history_window: default_history_window(),
            week_window: default_week_window(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".local/share")
    });
    base.join("liftlog")
}

fn default_cycle() -> Vec<String> {
    DEFAULT_CYCLE.clone()
}

fn default_rest_days_per_week() -> u8 {
    DEFAULT_REST_DAYS_PER_WEEK
}

fn default_history_window() -> usize {
    60
}

fn default_week_window() -> usize {
    30
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
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
        let base = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
        base.join("liftlog").join("config.toml")
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

    /// Check the tracker defaults against the same rules the live edits use
    pub fn validate(&self) -> Result<()> {
        let labels: Vec<&str> = self.tracker.default_cycle.iter().map(String::as_str).collect();
        if crate::rotation::normalize_cycle(&labels).is_empty() {
            return Err(Error::Config("default_cycle must contain a workout".into()));
        }
        if self.tracker.default_rest_days_per_week > MAX_REST_DAYS_PER_WEEK {
            return Err(Error::Config(format!(
                "default_rest_days_per_week must be between 0 and {}, got {}",
                MAX_REST_DAYS_PER_WEEK, self.tracker.default_rest_days_per_week
            )));
        }
        Ok(())
    }

    /// State created the first time the tracker is used
    pub fn initial_state(&self) -> TrackerState {
        let labels: Vec<&str> = self.tracker.default_cycle.iter().map(String::as_str).collect();
        let cycle = crate::rotation::normalize_cycle(&labels);
        if cycle.is_empty() {
            return TrackerState::default();
        }
        TrackerState::new(
            cycle,
            self.tracker
                .default_rest_days_per_week
                .min(MAX_REST_DAYS_PER_WEEK),
        )
    }
}
