//! Register Codec
//!
//! Turns raw 16-bit Modbus register words read from a solar inverter into
//! typed sensor readings.
//!
//! # Architecture
//!
//! - **Config**: [`RegisterConfig`] describes one sensor (address, data type,
//!   factor, offset, word order, lookup table); [`SensorDefinition`] is its
//!   declarative template form
//! - **Strategies**: one pure decode function per [`DataType`], selected by
//!   [`strategies::strategy_for`]
//! - **Parser**: [`RegisterParser`] runs the strategy and applies lookup,
//!   offset-before-factor scaling and range checks
//! - **Blocks**: [`RegisterBlock`] addresses a contiguous read by absolute
//!   register number
//!
//! # Example
//!
//! ```rust
//! use register_codec::{DataType, DecodedValue, RegisterConfig, RegisterParser};
//!
//! // Temperature biased by +1000, 0.1 °C per unit
//! let config = RegisterConfig::new("battery_temp", 182, DataType::Int16)
//!     .with_offset(1000)
//!     .with_factor(0.1);
//!
//! let value = RegisterParser::new().decode(&[1418], &config).unwrap();
//! assert_eq!(value, DecodedValue::Number(41.8));
//! ```

pub mod block;
pub mod config;
pub mod definition;
pub mod error;
pub mod parser;
pub mod strategies;
pub mod value;
pub mod words;

pub use block::{RegisterBlock, RegisterSource};
pub use config::{
    DataType, DateTimeEncoding, Lookup, RegisterAddress, RegisterConfig, ValueRange, WordCount,
};
pub use definition::{LookupKey, SensorDefinition};
pub use error::{ConfigError, DecodeError, Result};
pub use parser::RegisterParser;
pub use value::DecodedValue;
pub use words::Endianness;
