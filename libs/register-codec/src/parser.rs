//! Register parser
//!
//! Dispatches a [`RegisterConfig`] to its strategy and applies the shared
//! post-processing: lookup resolution, offset subtraction before factor
//! scaling, rounding and valid-range checks.

use tracing::trace;

use crate::block::RegisterSource;
use crate::config::RegisterConfig;
use crate::error::{DecodeError, Result};
use crate::strategies::{strategy_for, Reading};
use crate::value::DecodedValue;

/// Stateless register parser
///
/// Pure function of its inputs; safe to share between threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegisterParser;

impl RegisterParser {
    pub fn new() -> Self {
        Self
    }

    /// Decode the words belonging to one sensor
    pub fn decode(&self, words: &[u16], config: &RegisterConfig) -> Result<DecodedValue> {
        let strategy = strategy_for(config.data_type);
        let reading = strategy(words, config)?;
        let value = post_process(reading, config)?;

        trace!(
            sensor = %config.name,
            data_type = %config.data_type,
            words = ?words,
            value = %value,
            "Decoded register value"
        );
        Ok(value)
    }

    /// Pick the sensor's words out of a register source, then decode them
    pub fn decode_from<S>(&self, source: &S, config: &RegisterConfig) -> Result<DecodedValue>
    where
        S: RegisterSource + ?Sized,
    {
        let words = source.words_for(config)?;
        self.decode(&words, config)
    }
}

fn post_process(reading: Reading, config: &RegisterConfig) -> Result<DecodedValue> {
    match reading {
        Reading::Integer(raw) => {
            if let Some(lookup) = &config.lookup {
                return Ok(DecodedValue::Text(lookup.resolve(raw)));
            }
            let biased = raw.saturating_sub(config.offset);
            finish(biased as f64 * config.factor, config)
        },
        Reading::Float(raw) => finish((raw - config.offset as f64) * config.factor, config),
        Reading::Scaled(value) => finish(value, config),
        Reading::Text(text) => Ok(DecodedValue::Text(text)),
        Reading::Words(words) => Ok(DecodedValue::Raw(words)),
    }
}

fn finish(value: f64, config: &RegisterConfig) -> Result<DecodedValue> {
    let value = round2(value);
    if let Some(range) = config.valid_range {
        if !range.contains(value) {
            return Err(DecodeError::OutOfRange {
                sensor: config.name.clone(),
                value,
                min: range.min,
                max: range.max,
            });
        }
    }
    Ok(DecodedValue::Number(value))
}

/// Round to 2 decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::block::RegisterBlock;
    use crate::config::{DataType, Lookup};
    use crate::words::Endianness;

    fn number(value: DecodedValue) -> f64 {
        value.as_f64().expect("numeric value")
    }

    #[test]
    fn test_offset_before_factor() {
        let parser = RegisterParser::new();
        let config = RegisterConfig::new("battery_temp", 182, DataType::Int16)
            .with_offset(1000)
            .with_factor(0.1);
        assert_eq!(number(parser.decode(&[1418], &config).unwrap()), 41.8);
        assert_eq!(number(parser.decode(&[900], &config).unwrap()), -10.0);
    }

    #[test]
    fn test_uint16_scaling() {
        let parser = RegisterParser::new();
        let config = RegisterConfig::new("pv1_voltage", 109, DataType::Uint16).with_factor(0.1);
        assert_eq!(number(parser.decode(&[3567], &config).unwrap()), 356.7);
    }

    #[test]
    fn test_int16_negative_scaling() {
        let parser = RegisterParser::new();
        let config = RegisterConfig::new("battery_current", 191, DataType::Int16).with_factor(0.01);
        // 0xFC18 = -1000
        assert_eq!(number(parser.decode(&[0xFC18], &config).unwrap()), -10.0);
    }

    #[test]
    fn test_uint32_offset_and_factor() {
        let parser = RegisterParser::new();
        let config = RegisterConfig::new("total_energy", [63, 64], DataType::Uint32)
            .with_endianness(Endianness::Little)
            .with_offset(10)
            .with_factor(0.1);
        assert_eq!(number(parser.decode(&[1010, 0], &config).unwrap()), 100.0);
    }

    #[test]
    fn test_lookup_uses_pre_offset_raw() {
        let parser = RegisterParser::new();
        let config = RegisterConfig::new("run_state", 59, DataType::Uint16)
            .with_offset(1)
            .with_factor(10.0)
            .with_lookup(Lookup::new().with_entry(2, "Normal"));
        assert_eq!(
            parser.decode(&[2], &config).unwrap(),
            DecodedValue::from("Normal")
        );
        assert_eq!(
            parser.decode(&[4], &config).unwrap(),
            DecodedValue::from("Unknown (4)")
        );
    }

    #[test]
    fn test_lookup_on_signed_type() {
        let parser = RegisterParser::new();
        let config = RegisterConfig::new("grid_state", 10, DataType::Int16)
            .with_lookup(Lookup::new().with_entry(-1, "Fault").with_default("Other"));
        assert_eq!(
            parser.decode(&[0xFFFF], &config).unwrap(),
            DecodedValue::from("Fault")
        );
        assert_eq!(
            parser.decode(&[3], &config).unwrap(),
            DecodedValue::from("Other")
        );
    }

    #[test]
    fn test_sum_ignores_offset() {
        let parser = RegisterParser::new();
        let config = RegisterConfig::new("pv_power", vec![186, 187], DataType::Sum)
            .with_offset(100)
            .with_factor(0.5);
        assert_eq!(number(parser.decode(&[10, 20], &config).unwrap()), 15.0);
    }

    #[test]
    fn test_float32_scaling() {
        let parser = RegisterParser::new();
        let config = RegisterConfig::new("frequency", [1, 2], DataType::Float32).with_factor(2.0);
        assert_eq!(
            number(parser.decode(&[0x41C8, 0x0000], &config).unwrap()),
            50.0
        );
    }

    #[test]
    fn test_valid_range_rejects_outliers() {
        let parser = RegisterParser::new();
        let config = RegisterConfig::new("battery_power", [190, 191], DataType::Int32)
            .with_valid_range(-10_000.0, 10_000.0);
        assert_eq!(number(parser.decode(&[0, 500], &config).unwrap()), 500.0);

        let err = parser.decode(&[0x7FFF, 0xFFFF], &config).unwrap_err();
        assert!(matches!(err, DecodeError::OutOfRange { .. }));
        assert_eq!(err.sensor(), "battery_power");
    }

    #[test]
    fn test_raw_and_datetime_values() {
        let parser = RegisterParser::new();
        let raw = RegisterConfig::new("serial", vec![3, 4], DataType::Raw).with_factor(10.0);
        assert_eq!(
            parser.decode(&[0x4142, 0x4344], &raw).unwrap(),
            DecodedValue::Raw(vec![0x4142, 0x4344])
        );

        let datetime = RegisterConfig::new("clock", vec![62, 63, 64], DataType::Datetime);
        assert_eq!(
            parser.decode(&[0x1801, 0x0100, 0x0000], &datetime).unwrap(),
            DecodedValue::from("2024-01-01 00:00:00")
        );
    }

    #[test]
    fn test_decode_from_block() {
        let parser = RegisterParser::new();
        let block = RegisterBlock::new(60, vec![0, 0, 0, 5, 0]);
        let config = RegisterConfig::new("daily_energy", [63, 64], DataType::Uint32)
            .with_endianness(Endianness::Little);
        assert_eq!(number(parser.decode_from(&block, &config).unwrap()), 5.0);

        let outside = RegisterConfig::new("far_away", 200, DataType::Uint16);
        let err = parser.decode_from(&block, &outside).unwrap_err();
        assert_eq!(err, DecodeError::missing_register("far_away", 200));
    }
}
