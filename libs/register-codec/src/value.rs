//! Decoded sensor values

use std::fmt;

use serde::Serialize;

use crate::words::words_to_bytes;

/// Typed result of decoding one sensor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedValue {
    /// Scaled numeric reading
    Number(f64),
    /// Lookup label or formatted timestamp
    Text(String),
    /// Registers passed through unmodified
    Raw(Vec<u16>),
}

impl DecodedValue {
    /// Runtime type tag, used by health reports
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Raw(_) => "raw",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_words(&self) -> Option<&[u16]> {
        match self {
            Self::Raw(words) => Some(words),
            _ => None,
        }
    }
}

impl From<f64> for DecodedValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for DecodedValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for DecodedValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "{text}"),
            Self::Raw(words) => write!(f, "{}", render_raw(words)),
        }
    }
}

/// Render raw registers for display
///
/// One register renders as `0xNNNN`. Several registers render as ASCII when
/// every byte (after trimming trailing NULs) is printable, otherwise as
/// space-separated hex words.
pub fn render_raw(words: &[u16]) -> String {
    if let [word] = words {
        return format!("0x{word:04X}");
    }

    let bytes = words_to_bytes(words);
    let trimmed = match bytes.iter().rposition(|b| *b != 0) {
        Some(last) => &bytes[..=last],
        None => &[][..],
    };
    if !trimmed.is_empty() && trimmed.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        return trimmed.iter().map(|b| char::from(*b)).collect();
    }

    words
        .iter()
        .map(|w| format!("{w:04X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(DecodedValue::Number(1.0).type_tag(), "number");
        assert_eq!(DecodedValue::from("Normal").type_tag(), "text");
        assert_eq!(DecodedValue::Raw(vec![1]).type_tag(), "raw");
    }

    #[test]
    fn test_render_raw_single_register() {
        assert_eq!(render_raw(&[0x00AB]), "0x00AB");
    }

    #[test]
    fn test_render_raw_serial_number() {
        let words = [0x4445, 0x5945, 0x3132, 0x3334, 0x3536];
        assert_eq!(render_raw(&words), "DEYE123456");
    }

    #[test]
    fn test_render_raw_trailing_nul_trimmed() {
        assert_eq!(render_raw(&[0x4142, 0x4300]), "ABC");
    }

    #[test]
    fn test_render_raw_binary_falls_back_to_hex() {
        assert_eq!(
            render_raw(&[0x0000, 0x0001, 0x0000, 0x0004]),
            "0000 0001 0000 0004"
        );
        assert_eq!(render_raw(&[0x0000, 0x0000]), "0000 0000");
    }

    #[test]
    fn test_serialize_untagged() {
        let json = serde_json::to_string(&DecodedValue::Number(41.8)).unwrap();
        assert_eq!(json, "41.8");
        let json = serde_json::to_string(&DecodedValue::from("Normal")).unwrap();
        assert_eq!(json, "\"Normal\"");
        let json = serde_json::to_string(&DecodedValue::Raw(vec![1, 2])).unwrap();
        assert_eq!(json, "[1,2]");
    }
}
