//! Declarative sensor definitions
//!
//! [`SensorDefinition`] mirrors one sensor entry of a device template. It is
//! deserialized by the caller (YAML/JSON through serde) and converted into a
//! validated [`RegisterConfig`].
//!
//! Older templates omit `data_type`; it is then inferred:
//! - address list + `operation: sum` → sum
//! - address list + `is_32bit: true` → uint32
//! - address list otherwise → uint16
//! - single address with a negative factor → int16
//! - single address otherwise → uint16
//!
//! The stored factor is always the absolute value of the configured one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{
    DataType, DateTimeEncoding, Lookup, RegisterAddress, RegisterConfig, ValueRange,
};
use crate::error::ConfigError;
use crate::words::Endianness;

const DEFAULT_NAME: &str = "unknown";
const LOOKUP_DEFAULT_KEY: &str = "default";

/// Lookup table key as written in templates: an integer or the word `default`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupKey {
    Int(i64),
    Text(String),
}

/// One sensor entry as written in a device template
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorDefinition {
    pub name: Option<String>,
    pub address: Option<RegisterAddress>,
    pub data_type: Option<String>,
    /// Legacy: `sum` marks an address list as independent counters
    pub operation: Option<String>,
    /// Legacy: marks an address list as one 32-bit value
    pub is_32bit: Option<bool>,
    pub factor: Option<f64>,
    pub offset: Option<i64>,
    pub endianness: Option<String>,
    pub byte_swap: Option<bool>,
    pub lookup: Option<BTreeMap<LookupKey, String>>,
    pub valid_range: Option<Vec<f64>>,
    pub datetime_encoding: Option<DateTimeEncoding>,
}

impl SensorDefinition {
    pub fn into_config(self) -> Result<RegisterConfig, ConfigError> {
        RegisterConfig::try_from(self)
    }

    fn infer_data_type(&self, address: &RegisterAddress) -> DataType {
        if address.is_group() {
            if self.operation.as_deref() == Some("sum") {
                DataType::Sum
            } else if self.is_32bit == Some(true) {
                DataType::Uint32
            } else {
                DataType::Uint16
            }
        } else if self.factor.unwrap_or(1.0) < 0.0 {
            DataType::Int16
        } else {
            DataType::Uint16
        }
    }
}

impl TryFrom<SensorDefinition> for RegisterConfig {
    type Error = ConfigError;

    fn try_from(def: SensorDefinition) -> Result<Self, Self::Error> {
        let name = def.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_string());

        let address = def
            .address
            .clone()
            .ok_or_else(|| ConfigError::MissingAddress(name.clone()))?;

        let data_type = match def.data_type.as_deref() {
            Some(value) => {
                DataType::from_str(value).ok_or_else(|| ConfigError::UnknownDataType {
                    sensor: name.clone(),
                    value: value.to_string(),
                })?
            },
            None => {
                let inferred = def.infer_data_type(&address);
                debug!(sensor = %name, data_type = %inferred, "Inferred sensor data type");
                inferred
            },
        };

        let expected = data_type.word_count();
        if !expected.accepts(address.len()) {
            return Err(ConfigError::AddressCount {
                sensor: name,
                data_type,
                expected,
                actual: address.len(),
            });
        }

        let endianness = match def.endianness.as_deref() {
            Some(value) => {
                Endianness::from_str(value).ok_or_else(|| ConfigError::UnknownEndianness {
                    sensor: name.clone(),
                    value: value.to_string(),
                })?
            },
            None => Endianness::default(),
        };

        let lookup = match def.lookup {
            Some(table) if !data_type.is_integer() => {
                debug!(sensor = %name, entries = table.len(), "Rejecting lookup table");
                return Err(ConfigError::LookupNotSupported {
                    sensor: name,
                    data_type,
                });
            },
            Some(table) => Some(build_lookup(&name, table)?),
            None => None,
        };

        let valid_range = match def.valid_range {
            Some(bounds) => Some(build_range(&name, &bounds)?),
            None => None,
        };

        Ok(RegisterConfig {
            name,
            address,
            data_type,
            factor: def.factor.unwrap_or(1.0).abs(),
            offset: def.offset.unwrap_or(0),
            endianness,
            byte_swap: def.byte_swap.unwrap_or(false),
            lookup,
            valid_range,
            datetime_encoding: def.datetime_encoding.unwrap_or_default(),
        })
    }
}

fn build_lookup(sensor: &str, table: BTreeMap<LookupKey, String>) -> Result<Lookup, ConfigError> {
    let mut lookup = Lookup::new();
    for (key, label) in table {
        match key {
            LookupKey::Int(raw) => lookup = lookup.with_entry(raw, label),
            LookupKey::Text(text) if text == LOOKUP_DEFAULT_KEY => {
                lookup = lookup.with_default(label)
            },
            LookupKey::Text(text) => match text.trim().parse::<i64>() {
                Ok(raw) => lookup = lookup.with_entry(raw, label),
                Err(_) => {
                    return Err(ConfigError::InvalidLookupKey {
                        sensor: sensor.to_string(),
                        key: text,
                    })
                },
            },
        }
    }
    Ok(lookup)
}

fn build_range(sensor: &str, bounds: &[f64]) -> Result<ValueRange, ConfigError> {
    match *bounds {
        [min, max] if min <= max => Ok(ValueRange::new(min, max)),
        [min, max] => Err(ConfigError::InvalidRange {
            sensor: sensor.to_string(),
            detail: format!("min {min} greater than max {max}"),
        }),
        _ => Err(ConfigError::InvalidRange {
            sensor: sensor.to_string(),
            detail: format!("expected [min, max], got {} value(s)", bounds.len()),
        }),
    }
}
