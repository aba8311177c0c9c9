//! Monitor configuration
//!
//! Loaded from a YAML/TOML/JSON file through figment, with environment
//! overrides prefixed by [`ENV_PREFIX`].

use std::collections::BTreeMap;
use std::path::Path;

use common::LogConfig;
use register_codec::SensorDefinition;
use sensor_health::HealthSettings;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::SensorCatalog;
use crate::error::{MonitorError, Result};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "INVERTER_MONITOR_";
/// Default number of registers per read request
pub const DEFAULT_BATCH_SIZE: u16 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub logging: LogConfig,
    pub health: HealthSettings,
    /// Registers per read request
    pub batch_size: u16,
    /// Sensor definitions keyed by sensor id, iterated in id order
    ///
    /// Figment merges providers into sorted dictionaries, so file order is
    /// not kept.
    pub sensors: BTreeMap<String, SensorDefinition>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            logging: LogConfig::default(),
            health: HealthSettings::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            sensors: BTreeMap::new(),
        }
    }
}

impl MonitorConfig {
    /// Load from a file only
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = common::load_config_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file merged with `INVERTER_MONITOR_*` environment variables
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: Self = common::load_config(path, ENV_PREFIX)?;
        config.validate()?;
        info!(
            path = %path.display(),
            sensors = config.sensors.len(),
            batch_size = config.batch_size,
            "Loaded monitor configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(MonitorError::invalid_setting(
                "batch_size must be at least 1",
            ));
        }
        self.health
            .thresholds
            .validate()
            .map_err(MonitorError::invalid_setting)?;
        if self.sensors.keys().any(|id| id.trim().is_empty()) {
            return Err(MonitorError::invalid_setting("sensor id cannot be empty"));
        }
        Ok(())
    }

    /// Build the sensor catalog in sensor id order
    ///
    /// Invalid definitions end up in [`SensorCatalog::rejected`].
    pub fn catalog(&self) -> Result<SensorCatalog> {
        SensorCatalog::from_definitions(self.sensors.clone())
    }
}
