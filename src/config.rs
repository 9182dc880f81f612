//! User configuration stored in `config.toml`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::widget::{EmbedOptions, SimulatedOptions};

const APP_DIR: &str = "linkdeck";

/// Coordinator delays, all in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Wait before tearing down sibling surfaces after a promotion
    pub eviction_delay_ms: u64,
    /// Wait before releasing a surface whose modal closed without playing
    pub release_grace_ms: u64,
    /// Progress events ignored after a seek on the promoted track
    pub global_seek_suppression_ms: u64,
    /// Progress updates ignored after a seek committed from a card
    pub local_seek_suppression_ms: u64,
    /// Card position polling while playing unpromoted
    pub position_poll_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            eviction_delay_ms: 500,
            release_grace_ms: 100,
            global_seek_suppression_ms: 600,
            local_seek_suppression_ms: 800,
            position_poll_ms: 500,
        }
    }
}

impl Timings {
    pub fn eviction_delay(&self) -> Duration {
        Duration::from_millis(self.eviction_delay_ms)
    }

    pub fn release_grace(&self) -> Duration {
        Duration::from_millis(self.release_grace_ms)
    }

    pub fn global_seek_suppression(&self) -> Duration {
        Duration::from_millis(self.global_seek_suppression_ms)
    }

    pub fn local_seek_suppression(&self) -> Duration {
        Duration::from_millis(self.local_seek_suppression_ms)
    }

    pub fn position_poll(&self) -> Duration {
        // A zero interval would make tokio's interval panic
        Duration::from_millis(self.position_poll_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub load_delay_ms: u64,
    pub tick_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            load_delay_ms: 300,
            tick_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_prefix: String,
    /// Used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: ".logs".to_string(),
            file_prefix: "linkdeck".to_string(),
            default_filter: "linkdeck=debug,warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    pub timings: Timings,
    pub embed: EmbedOptions,
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
}

impl DeckConfig {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn default_profile_path() -> PathBuf {
        Self::config_dir().join("profile.toml")
    }

    /// Load from `path`, or from the default location.
    ///
    /// An explicit path must exist. At the default location a missing file is
    /// created with the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let path = Self::default_config_path();
                if path.exists() {
                    Self::read(&path)
                } else {
                    let config = Self::default();
                    config.write_default(&path);
                    Ok(config)
                }
            }
        }
    }

    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn simulated_options(&self) -> SimulatedOptions {
        SimulatedOptions {
            load_delay: Duration::from_millis(self.simulation.load_delay_ms),
            tick: (self.simulation.tick_ms > 0).then(|| Duration::from_millis(self.simulation.tick_ms)),
            embed: self.embed.clone(),
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    fn write_default(&self, path: &Path) {
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        match self.to_toml_string() {
            Ok(content) => {
                if let Err(e) = fs::write(path, content) {
                    tracing::debug!(path = %path.display(), error = %e, "Could not write default config");
                }
            }
            Err(e) => tracing::debug!(error = %e, "Could not serialize default config"),
        }
    }
}
