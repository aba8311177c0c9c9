//! Per-sensor decoding descriptors
//!
//! A [`RegisterConfig`] describes how one logical sensor is decoded from one or
//! more raw registers. It is built once when templates are loaded and then shared
//! read-only (usually behind an `Arc`) by every poll cycle.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::words::Endianness;

/// Supported register data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Single 16-bit unsigned
    Uint16,
    /// Single 16-bit signed
    Int16,
    /// 32-bit unsigned (2 registers)
    Uint32,
    /// 32-bit signed (2 registers)
    Int32,
    /// 32-bit IEEE-754 float (2 registers)
    Float32,
    /// Independent counters added together (2+ registers)
    Sum,
    /// Registers passed through unmodified
    Raw,
    /// Date/time packed into 3 registers
    Datetime,
}

impl DataType {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "uint16" | "u16" => Some(Self::Uint16),
            "int16" | "i16" => Some(Self::Int16),
            "uint32" | "u32" => Some(Self::Uint32),
            "int32" | "i32" => Some(Self::Int32),
            "float32" | "f32" | "float" => Some(Self::Float32),
            "sum" => Some(Self::Sum),
            "raw" => Some(Self::Raw),
            "datetime" => Some(Self::Datetime),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uint16 => "uint16",
            Self::Int16 => "int16",
            Self::Uint32 => "uint32",
            Self::Int32 => "int32",
            Self::Float32 => "float32",
            Self::Sum => "sum",
            Self::Raw => "raw",
            Self::Datetime => "datetime",
        }
    }

    /// Number of register words this type consumes
    pub fn word_count(&self) -> WordCount {
        match self {
            Self::Uint16 | Self::Int16 => WordCount::Exactly(1),
            Self::Uint32 | Self::Int32 | Self::Float32 => WordCount::Exactly(2),
            Self::Sum => WordCount::AtLeast(2),
            Self::Raw => WordCount::AtLeast(1),
            Self::Datetime => WordCount::Exactly(3),
        }
    }

    /// Integer-valued types accept lookup tables
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Uint16 | Self::Int16 | Self::Uint32 | Self::Int32
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Register word count requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCount {
    Exactly(usize),
    AtLeast(usize),
}

impl WordCount {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Register address of a sensor: one index or an ordered group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegisterAddress {
    Single(u16),
    Group(Vec<u16>),
}

impl RegisterAddress {
    pub fn as_slice(&self) -> &[u16] {
        match self {
            Self::Single(address) => std::slice::from_ref(address),
            Self::Group(addresses) => addresses,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

impl From<u16> for RegisterAddress {
    fn from(address: u16) -> Self {
        Self::Single(address)
    }
}

impl From<[u16; 2]> for RegisterAddress {
    fn from(pair: [u16; 2]) -> Self {
        Self::Group(pair.to_vec())
    }
}

impl From<Vec<u16>> for RegisterAddress {
    fn from(addresses: Vec<u16>) -> Self {
        Self::Group(addresses)
    }
}

/// Byte encoding of date/time fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateTimeEncoding {
    /// Each byte holds the plain binary value
    #[default]
    Binary,
    /// Each byte holds two packed BCD digits
    Bcd,
}

/// Mapping from raw integer register values to display labels
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Lookup {
    entries: BTreeMap<i64, String>,
    default: Option<String>,
}

impl Lookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, raw: i64, label: impl Into<String>) -> Self {
        self.entries.insert(raw, label.into());
        self
    }

    pub fn with_default(mut self, label: impl Into<String>) -> Self {
        self.default = Some(label.into());
        self
    }

    pub fn get(&self, raw: i64) -> Option<&str> {
        self.entries.get(&raw).map(String::as_str)
    }

    pub fn default_label(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a raw value to its label
    ///
    /// Misses fall back to the configured default, then to `Unknown (<raw>)`.
    pub fn resolve(&self, raw: i64) -> String {
        match (self.get(raw), &self.default) {
            (Some(label), _) => label.to_string(),
            (None, Some(default)) => default.clone(),
            (None, None) => format!("Unknown ({raw})"),
        }
    }
}

/// Inclusive range a decoded numeric value must fall into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Decoding descriptor for one sensor
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterConfig {
    /// Sensor identifier used in errors and logs
    pub name: String,
    pub address: RegisterAddress,
    pub data_type: DataType,
    /// Multiplier applied after offset subtraction
    pub factor: f64,
    /// Subtracted from the raw integer before scaling
    pub offset: i64,
    /// Word order for 32-bit values
    pub endianness: Endianness,
    /// Swap bytes inside each register before reconstruction
    pub byte_swap: bool,
    pub lookup: Option<Lookup>,
    pub valid_range: Option<ValueRange>,
    pub datetime_encoding: DateTimeEncoding,
}

impl RegisterConfig {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<RegisterAddress>,
        data_type: DataType,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            data_type,
            factor: 1.0,
            offset: 0,
            endianness: Endianness::default(),
            byte_swap: false,
            lookup: None,
            valid_range: None,
            datetime_encoding: DateTimeEncoding::default(),
        }
    }

    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    pub fn with_byte_swap(mut self, byte_swap: bool) -> Self {
        self.byte_swap = byte_swap;
        self
    }

    pub fn with_lookup(mut self, lookup: Lookup) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn with_valid_range(mut self, min: f64, max: f64) -> Self {
        self.valid_range = Some(ValueRange::new(min, max));
        self
    }

    pub fn with_datetime_encoding(mut self, encoding: DateTimeEncoding) -> Self {
        self.datetime_encoding = encoding;
        self
    }

    /// True when the address is a register pair
    pub fn is_32bit(&self) -> bool {
        self.address.len() == 2
    }

    /// Word count a decode call must supply for this sensor
    ///
    /// Variable-width types are pinned to the configured address count once it
    /// satisfies the type's minimum.
    pub fn expected_words(&self) -> WordCount {
        match self.data_type.word_count() {
            WordCount::AtLeast(min) if self.address.len() >= min => {
                WordCount::Exactly(self.address.len())
            },
            other => other,
        }
    }
}
