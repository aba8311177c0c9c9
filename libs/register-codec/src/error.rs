//! Register codec error types

use thiserror::Error;

use crate::config::{DataType, WordCount};

/// Result type for decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Failure to turn register words into a sensor value
///
/// Every variant names the sensor it belongs to.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// Supplied word count disagrees with the data type
    #[error("Sensor '{sensor}': {data_type} expects {expected} register word(s), got {actual}")]
    WordCount {
        sensor: String,
        data_type: DataType,
        expected: WordCount,
        actual: usize,
    },

    /// Date/time fields do not form a valid calendar value
    #[error("Sensor '{sensor}': invalid date/time: {detail}")]
    InvalidDateTime { sensor: String, detail: String },

    /// Float register pair holds NaN or infinity
    #[error("Sensor '{sensor}': {data_type} decoded to a non-finite value")]
    NonFinite { sensor: String, data_type: DataType },

    /// Decoded value outside the configured valid range
    #[error("Sensor '{sensor}': value {value} outside valid range [{min}, {max}]")]
    OutOfRange {
        sensor: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Register block does not cover a configured address
    #[error("Sensor '{sensor}': register {address} missing from block")]
    MissingRegister { sensor: String, address: u16 },
}

impl DecodeError {
    /// Sensor identifier the failure belongs to
    pub fn sensor(&self) -> &str {
        match self {
            DecodeError::WordCount { sensor, .. }
            | DecodeError::InvalidDateTime { sensor, .. }
            | DecodeError::NonFinite { sensor, .. }
            | DecodeError::OutOfRange { sensor, .. }
            | DecodeError::MissingRegister { sensor, .. } => sensor,
        }
    }

    pub fn invalid_datetime(sensor: impl Into<String>, detail: impl Into<String>) -> Self {
        DecodeError::InvalidDateTime {
            sensor: sensor.into(),
            detail: detail.into(),
        }
    }

    pub fn missing_register(sensor: impl Into<String>, address: u16) -> Self {
        DecodeError::MissingRegister {
            sensor: sensor.into(),
            address,
        }
    }
}

/// Invalid declarative sensor definition
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing 'address' in sensor config '{0}'")]
    MissingAddress(String),

    #[error("Sensor '{sensor}': unknown data type '{value}'")]
    UnknownDataType { sensor: String, value: String },

    #[error("Sensor '{sensor}': unknown endianness '{value}'")]
    UnknownEndianness { sensor: String, value: String },

    #[error("Sensor '{sensor}': {data_type} needs {expected} address(es), got {actual}")]
    AddressCount {
        sensor: String,
        data_type: DataType,
        expected: WordCount,
        actual: usize,
    },

    #[error("Sensor '{sensor}': lookup tables are not supported for {data_type}")]
    LookupNotSupported { sensor: String, data_type: DataType },

    #[error("Sensor '{sensor}': invalid lookup key '{key}'")]
    InvalidLookupKey { sensor: String, key: String },

    #[error("Sensor '{sensor}': invalid valid_range {detail}")]
    InvalidRange { sensor: String, detail: String },
}
