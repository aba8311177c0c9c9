//! Monitor error types

use thiserror::Error;

/// Errors raised while building the monitor from configuration
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Loading or parsing the configuration failed
    #[error(transparent)]
    Config(#[from] common::Error),

    #[error("Duplicate sensor id '{0}'")]
    DuplicateSensor(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

pub type Result<T> = std::result::Result<T, MonitorError>;

impl MonitorError {
    pub fn invalid_setting(msg: impl Into<String>) -> Self {
        Self::InvalidSetting(msg.into())
    }
}
