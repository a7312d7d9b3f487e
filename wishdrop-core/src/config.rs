//! TOML configuration.
//!
//! Every key is optional; anything missing falls back to the defaults below.
//!
//! ```toml
//! data_dir = "data"
//!
//! [simulator]
//! days = 60
//! start_band = [0.92, 1.06]
//! drift = 0.012
//! shock_probability = 0.05
//! shock_band = [0.90, 0.97]
//! floor = 5.0
//!
//! [signal]
//! window = 30
//! near_low_tolerance = 1.02
//!
//! [cache]
//! capacity = 256
//!
//! [alerts]
//! default_threshold_pct = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cache::DEFAULT_CAPACITY;
use crate::domain::board::THRESHOLD_RANGE;
use crate::domain::DEFAULT_THRESHOLD_PCT;
use crate::signal::SignalConfig;
use crate::simulator::SimulatorConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub default_threshold_pct: u32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            default_threshold_pct: DEFAULT_THRESHOLD_PCT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WishdropConfig {
    /// Directory holding `profiles.json`, `boards.json` and the catalog CSV.
    pub data_dir: PathBuf,
    pub simulator: SimulatorConfig,
    pub signal: SignalConfig,
    pub cache: CacheConfig,
    pub alerts: AlertConfig,
}

impl Default for WishdropConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            simulator: SimulatorConfig::default(),
            signal: SignalConfig::default(),
            cache: CacheConfig::default(),
            alerts: AlertConfig::default(),
        }
    }
}

impl WishdropConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulator.validate().map_err(ConfigError::Invalid)?;
        self.signal.validate().map_err(ConfigError::Invalid)?;
        if self.cache.capacity == 0 {
            return Err(ConfigError::Invalid("cache.capacity must be >= 1".into()));
        }
        if !THRESHOLD_RANGE.contains(&self.alerts.default_threshold_pct) {
            return Err(ConfigError::Invalid(format!(
                "alerts.default_threshold_pct must be in {}..={}, got {}",
                THRESHOLD_RANGE.start(),
                THRESHOLD_RANGE.end(),
                self.alerts.default_threshold_pct
            )));
        }
        Ok(())
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join("sample_products.csv")
    }
}
