//! Decoding strategies, one per data type
//!
//! Each strategy is a plain function that validates the supplied words and
//! reconstructs the raw reading. Shared post-processing (offset, factor,
//! lookup, range checks) lives in [`crate::parser`]. Selection goes through
//! [`strategy_for`], a single match over [`DataType`], so adding a type means
//! adding one function and one match arm.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::{DataType, DateTimeEncoding, RegisterConfig};
use crate::error::{DecodeError, Result};
use crate::words::{
    bcd_to_u8, combine_words, split_word, swap_bytes, word_to_i16, words_to_f32, words_to_i32,
};

/// Timestamp layout produced by the datetime strategy
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw reading reconstructed by a strategy, before post-processing
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    /// Integer register value; subject to lookup, offset and factor
    Integer(i64),
    /// Float register value; subject to offset and factor
    Float(f64),
    /// Already scaled by the strategy
    Scaled(f64),
    /// Final text value
    Text(String),
    /// Unmodified registers
    Words(Vec<u16>),
}

/// Signature shared by all strategies
pub type DecodeFn = fn(&[u16], &RegisterConfig) -> Result<Reading>;

/// Select the strategy for a data type
pub fn strategy_for(data_type: DataType) -> DecodeFn {
    match data_type {
        DataType::Uint16 => decode_uint16,
        DataType::Int16 => decode_int16,
        DataType::Uint32 => decode_uint32,
        DataType::Int32 => decode_int32,
        DataType::Float32 => decode_float32,
        DataType::Sum => decode_sum,
        DataType::Raw => decode_raw,
        DataType::Datetime => decode_datetime,
    }
}

fn check_word_count(words: &[u16], config: &RegisterConfig) -> Result<()> {
    let expected = config.expected_words();
    if expected.accepts(words.len()) {
        Ok(())
    } else {
        Err(DecodeError::WordCount {
            sensor: config.name.clone(),
            data_type: config.data_type,
            expected,
            actual: words.len(),
        })
    }
}

fn prepare(word: u16, config: &RegisterConfig) -> u16 {
    if config.byte_swap {
        swap_bytes(word)
    } else {
        word
    }
}

fn single(words: &[u16], config: &RegisterConfig) -> Result<u16> {
    check_word_count(words, config)?;
    Ok(prepare(words[0], config))
}

fn pair(words: &[u16], config: &RegisterConfig) -> Result<[u16; 2]> {
    check_word_count(words, config)?;
    Ok([prepare(words[0], config), prepare(words[1], config)])
}

pub fn decode_uint16(words: &[u16], config: &RegisterConfig) -> Result<Reading> {
    let word = single(words, config)?;
    Ok(Reading::Integer(i64::from(word)))
}

pub fn decode_int16(words: &[u16], config: &RegisterConfig) -> Result<Reading> {
    let word = single(words, config)?;
    Ok(Reading::Integer(i64::from(word_to_i16(word))))
}

pub fn decode_uint32(words: &[u16], config: &RegisterConfig) -> Result<Reading> {
    let words = pair(words, config)?;
    Ok(Reading::Integer(i64::from(combine_words(
        words,
        config.endianness,
    ))))
}

pub fn decode_int32(words: &[u16], config: &RegisterConfig) -> Result<Reading> {
    let words = pair(words, config)?;
    Ok(Reading::Integer(i64::from(words_to_i32(
        words,
        config.endianness,
    ))))
}

pub fn decode_float32(words: &[u16], config: &RegisterConfig) -> Result<Reading> {
    let words = pair(words, config)?;
    let value = words_to_f32(words, config.endianness);
    if !value.is_finite() {
        return Err(DecodeError::NonFinite {
            sensor: config.name.clone(),
            data_type: config.data_type,
        });
    }
    Ok(Reading::Float(f64::from(value)))
}

/// Independent counters, each scaled and then added
///
/// Not a wide integer: `[a, b]` yields `a * factor + b * factor`.
pub fn decode_sum(words: &[u16], config: &RegisterConfig) -> Result<Reading> {
    check_word_count(words, config)?;
    let total = words
        .iter()
        .map(|&word| f64::from(prepare(word, config)) * config.factor)
        .sum::<f64>();
    Ok(Reading::Scaled(total))
}

pub fn decode_raw(words: &[u16], config: &RegisterConfig) -> Result<Reading> {
    check_word_count(words, config)?;
    Ok(Reading::Words(words.to_vec()))
}

/// Date/time from 3 registers
///
/// Layout (high byte / low byte): `[year / month, day / hour, minute / second]`,
/// with the year counted from 2000.
pub fn decode_datetime(words: &[u16], config: &RegisterConfig) -> Result<Reading> {
    check_word_count(words, config)?;

    let mut fields = [0u8; 6];
    for (i, &word) in words.iter().enumerate() {
        let (high, low) = split_word(word);
        fields[i * 2] = field_value(high, config)?;
        fields[i * 2 + 1] = field_value(low, config)?;
    }
    let [year, month, day, hour, minute, second] = fields;

    let date = NaiveDate::from_ymd_opt(
        2000 + i32::from(year),
        u32::from(month),
        u32::from(day),
    )
    .ok_or_else(|| {
        DecodeError::invalid_datetime(
            &config.name,
            format!(
                "date {}-{month:02}-{day:02} out of range",
                2000 + u32::from(year)
            ),
        )
    })?;
    let time = NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), u32::from(second))
        .ok_or_else(|| {
            DecodeError::invalid_datetime(
                &config.name,
                format!("time {hour:02}:{minute:02}:{second:02} out of range"),
            )
        })?;

    let timestamp = NaiveDateTime::new(date, time);
    Ok(Reading::Text(timestamp.format(DATETIME_FORMAT).to_string()))
}

fn field_value(byte: u8, config: &RegisterConfig) -> Result<u8> {
    match config.datetime_encoding {
        DateTimeEncoding::Binary => Ok(byte),
        DateTimeEncoding::Bcd => bcd_to_u8(byte).ok_or_else(|| {
            DecodeError::invalid_datetime(&config.name, format!("byte 0x{byte:02X} is not BCD"))
        }),
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::config::WordCount;
    use crate::words::Endianness;

    fn config(data_type: DataType, address: Vec<u16>) -> RegisterConfig {
        RegisterConfig::new("test_sensor", address, data_type)
    }

    #[test]
    fn test_strategy_table_covers_each_type() {
        let uint16 = config(DataType::Uint16, vec![1]);
        assert_eq!(
            strategy_for(DataType::Uint16)(&[0xFFFF], &uint16).unwrap(),
            Reading::Integer(65535)
        );
        let int16 = config(DataType::Int16, vec![1]);
        assert_eq!(
            strategy_for(DataType::Int16)(&[0xFFFF], &int16).unwrap(),
            Reading::Integer(-1)
        );
    }

    #[test]
    fn test_int16_boundaries() {
        let cfg = config(DataType::Int16, vec![1]);
        assert_eq!(decode_int16(&[0x7FFF], &cfg).unwrap(), Reading::Integer(32767));
        assert_eq!(decode_int16(&[0x8000], &cfg).unwrap(), Reading::Integer(-32768));
    }

    #[test]
    fn test_uint32_word_order() {
        let big = config(DataType::Uint32, vec![10, 11]);
        assert_eq!(decode_uint32(&[0, 5], &big).unwrap(), Reading::Integer(5));
        assert_eq!(
            decode_uint32(&[1, 0], &big).unwrap(),
            Reading::Integer(65536)
        );

        let little = big.clone().with_endianness(Endianness::Little);
        assert_eq!(decode_uint32(&[5, 0], &little).unwrap(), Reading::Integer(5));
        assert_eq!(
            decode_uint32(&[0xFFFF, 0xFFFF], &little).unwrap(),
            Reading::Integer(4_294_967_295)
        );
    }

    #[test]
    fn test_int32_sign() {
        let cfg = config(DataType::Int32, vec![10, 11]);
        assert_eq!(
            decode_int32(&[0xFFFF, 0xFF9C], &cfg).unwrap(),
            Reading::Integer(-100)
        );
        assert_eq!(
            decode_int32(&[0x7FFF, 0xFFFF], &cfg).unwrap(),
            Reading::Integer(i64::from(i32::MAX))
        );
    }

    #[test]
    fn test_byte_swap_applies_before_reconstruction() {
        let cfg = config(DataType::Uint16, vec![1]).with_byte_swap(true);
        assert_eq!(decode_uint16(&[0x3412], &cfg).unwrap(), Reading::Integer(0x1234));

        let cfg = config(DataType::Uint32, vec![1, 2]).with_byte_swap(true);
        assert_eq!(
            decode_uint32(&[0x0100, 0x0200], &cfg).unwrap(),
            Reading::Integer(0x0001_0002)
        );
    }

    #[test]
    fn test_float32() {
        let cfg = config(DataType::Float32, vec![1, 2]);
        assert_eq!(
            decode_float32(&[0x41C8, 0x0000], &cfg).unwrap(),
            Reading::Float(25.0)
        );

        let err = decode_float32(&[0x7FC0, 0x0000], &cfg).unwrap_err();
        assert!(matches!(err, DecodeError::NonFinite { .. }));
    }

    #[test]
    fn test_sum_is_not_wide_integer() {
        let cfg = config(DataType::Sum, vec![1, 2]).with_factor(0.1);
        let Reading::Scaled(total) = decode_sum(&[100, 200], &cfg).unwrap() else {
            panic!("sum must produce a scaled reading");
        };
        assert!((total - 30.0).abs() < 1e-9);

        let wide = config(DataType::Uint32, vec![1, 2]);
        assert_eq!(
            decode_uint32(&[100, 200], &wide).unwrap(),
            Reading::Integer(100 * 65536 + 200)
        );
    }

    #[test]
    fn test_raw_passthrough() {
        let cfg = config(DataType::Raw, vec![3, 4, 5]);
        assert_eq!(
            decode_raw(&[0x4445, 0x5945, 0x0000], &cfg).unwrap(),
            Reading::Words(vec![0x4445, 0x5945, 0x0000])
        );
    }

    #[test]
    fn test_datetime_binary() {
        let cfg = config(DataType::Datetime, vec![62, 63, 64]);
        // 2024-03-15 13:45:30
        let words = [0x1803, 0x0F0D, 0x2D1E];
        assert_eq!(
            decode_datetime(&words, &cfg).unwrap(),
            Reading::Text("2024-03-15 13:45:30".to_string())
        );
    }

    #[test]
    fn test_datetime_bcd() {
        let cfg = config(DataType::Datetime, vec![62, 63, 64])
            .with_datetime_encoding(DateTimeEncoding::Bcd);
        let words = [0x2403, 0x1513, 0x4530];
        assert_eq!(
            decode_datetime(&words, &cfg).unwrap(),
            Reading::Text("2024-03-15 13:45:30".to_string())
        );

        let err = decode_datetime(&[0x2A03, 0x1513, 0x4530], &cfg).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidDateTime { .. }));
    }

    #[test]
    fn test_datetime_invalid_calendar_values() {
        let cfg = config(DataType::Datetime, vec![62, 63, 64]);
        // month 13
        let err = decode_datetime(&[0x180D, 0x010C, 0x0000], &cfg).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidDateTime { .. }));
        // February 30th
        let err = decode_datetime(&[0x1802, 0x1E0C, 0x0000], &cfg).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidDateTime { .. }));
        // hour 24
        let err = decode_datetime(&[0x1801, 0x0118, 0x0000], &cfg).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidDateTime { .. }));
    }

    #[test]
    fn test_word_count_mismatch() {
        let cfg = config(DataType::Uint32, vec![10, 11]);
        let err = decode_uint32(&[5], &cfg).unwrap_err();
        assert_eq!(
            err,
            DecodeError::WordCount {
                sensor: "test_sensor".to_string(),
                data_type: DataType::Uint32,
                expected: WordCount::Exactly(2),
                actual: 1,
            }
        );

        let cfg = config(DataType::Uint16, vec![1]);
        assert!(decode_uint16(&[], &cfg).is_err());
        assert!(decode_uint16(&[1, 2], &cfg).is_err());

        let cfg = config(DataType::Datetime, vec![62, 63, 64]);
        assert!(decode_datetime(&[0x1803, 0x0F0D], &cfg).is_err());

        let cfg = config(DataType::Sum, vec![1, 2, 3]);
        assert!(decode_sum(&[1, 2], &cfg).is_err());
    }
}
