//! Word order and register-level conversions
//!
//! Provides functions for converting between:
//! - Register pairs (u16[2]) → u32, i32, f32 with configurable word order
//! - Single registers → byte fields (high/low byte, byte swap)
//! - Packed BCD bytes → decimal values

use serde::{Deserialize, Serialize};

/// Word order used when two 16-bit registers form one 32-bit value
///
/// For the 32-bit value `0x12345678`:
/// - `Big`: registers `[0x1234, 0x5678]` (high word first)
/// - `Little`: registers `[0x5678, 0x1234]` (low word first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Endianness {
    /// High word at the first address
    Big,
    /// Low word at the first address
    Little,
}

impl Endianness {
    /// Convert from the string forms found in device templates
    ///
    /// - "big", "be", "big_endian", "ABCD" → Big
    /// - "little", "le", "little_endian", "CDAB" → Little
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.trim().to_uppercase().replace('-', "");
        match normalized.as_str() {
            "BIG" | "BE" | "BIG_ENDIAN" | "BIGENDIAN" | "ABCD" => Some(Self::Big),
            "LITTLE" | "LE" | "LITTLE_ENDIAN" | "LITTLEENDIAN" | "CDAB" => Some(Self::Little),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Big => "big",
            Self::Little => "little",
        }
    }
}

impl Default for Endianness {
    /// Default to big word order (high word first)
    fn default() -> Self {
        Self::Big
    }
}

impl std::fmt::Display for Endianness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Endianness {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).ok_or_else(|| format!("unknown endianness '{value}'"))
    }
}

// ============================================================================
// Register Pair Conversions
// ============================================================================

/// Combine 2 u16 registers into a u32 using the given word order
pub fn combine_words(words: [u16; 2], order: Endianness) -> u32 {
    let [first, second] = words;
    let (high, low) = match order {
        Endianness::Big => (first, second),
        Endianness::Little => (second, first),
    };
    (u32::from(high) << 16) | u32::from(low)
}

/// Combine 2 u16 registers into an i32 (two's complement)
pub fn words_to_i32(words: [u16; 2], order: Endianness) -> i32 {
    combine_words(words, order) as i32
}

/// Combine 2 u16 registers into an IEEE-754 f32
pub fn words_to_f32(words: [u16; 2], order: Endianness) -> f32 {
    f32::from_bits(combine_words(words, order))
}

// ============================================================================
// Single Register Conversions
// ============================================================================

/// Reinterpret a register as a signed 16-bit value
pub fn word_to_i16(word: u16) -> i16 {
    word as i16
}

/// Swap the two bytes of a register (AB → BA)
pub fn swap_bytes(word: u16) -> u16 {
    word.swap_bytes()
}

/// Split a register into its (high, low) bytes
pub fn split_word(word: u16) -> (u8, u8) {
    let [high, low] = word.to_be_bytes();
    (high, low)
}

/// Flatten registers into bytes, high byte first
pub fn words_to_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

// ============================================================================
// BCD Conversions
// ============================================================================

/// Convert one packed BCD byte (two decimal digits) to its value
///
/// Returns `None` when either nibble is not a decimal digit.
pub fn bcd_to_u8(byte: u8) -> Option<u8> {
    let high = (byte >> 4) & 0x0F;
    let low = byte & 0x0F;

    if high > 9 || low > 9 {
        return None;
    }

    Some(high * 10 + low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_valid() {
        assert_eq!(Endianness::from_str("big"), Some(Endianness::Big));
        assert_eq!(Endianness::from_str("BE"), Some(Endianness::Big));
        assert_eq!(Endianness::from_str("AB-CD"), Some(Endianness::Big));

        assert_eq!(Endianness::from_str("little"), Some(Endianness::Little));
        assert_eq!(Endianness::from_str("le"), Some(Endianness::Little));
        assert_eq!(Endianness::from_str("CDAB"), Some(Endianness::Little));
    }

    #[test]
    fn test_from_str_invalid() {
        assert_eq!(Endianness::from_str("middle"), None);
        assert_eq!(Endianness::from_str(""), None);
    }

    #[test]
    fn test_default() {
        assert_eq!(Endianness::default(), Endianness::Big);
    }

    #[test]
    fn test_combine_words_both_orders() {
        let words = [0x1234, 0x5678];
        assert_eq!(combine_words(words, Endianness::Big), 0x1234_5678);
        assert_eq!(combine_words(words, Endianness::Little), 0x5678_1234);
    }

    #[test]
    fn test_words_to_i32_negative() {
        assert_eq!(words_to_i32([0xFFFF, 0xFFFE], Endianness::Big), -2);
        assert_eq!(words_to_i32([0xFFFE, 0xFFFF], Endianness::Little), -2);
        assert_eq!(words_to_i32([0x0000, 0x0001], Endianness::Big), 1);
    }

    #[test]
    fn test_words_to_f32() {
        // 25.0 in IEEE 754: 0x41C80000
        let value = words_to_f32([0x41C8, 0x0000], Endianness::Big);
        assert!((value - 25.0).abs() < f32::EPSILON);

        let value = words_to_f32([0x0000, 0x41C8], Endianness::Little);
        assert!((value - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_byte_helpers() {
        assert_eq!(swap_bytes(0x1234), 0x3412);
        assert_eq!(split_word(0x180C), (0x18, 0x0C));
        assert_eq!(words_to_bytes(&[0x4445, 0x5945]), vec![0x44, 0x45, 0x59, 0x45]);
        assert_eq!(word_to_i16(0xFFFF), -1);
    }

    #[test]
    fn test_bcd_to_u8() {
        assert_eq!(bcd_to_u8(0x00), Some(0));
        assert_eq!(bcd_to_u8(0x24), Some(24));
        assert_eq!(bcd_to_u8(0x59), Some(59));
        assert_eq!(bcd_to_u8(0x1A), None);
        assert_eq!(bcd_to_u8(0xA1), None);
    }
}
