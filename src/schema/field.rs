//! Field layout: how to pull one value out of one byte of a frame.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Bit-level layout of a single field.
///
/// Describes the extraction `(frame[byte] & mask) >> shift`. Each field lives
/// entirely within one byte; multi-byte fields are not supported.
///
/// In the schema document the mask is a hexadecimal string (`"0xFF"`,
/// `"0x30"`, with or without the `0x` prefix) and the shift an integer in
/// `0..=7`. Both are validated while the document is deserialized, so a
/// loaded [`FieldSpec`] always describes a valid single-byte operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSpec {
    /// Byte offset into the frame.
    pub byte: usize,
    /// Bitmask applied before shifting.
    #[serde(deserialize_with = "hex_mask")]
    pub mask: u8,
    /// Right shift applied after masking.
    #[serde(deserialize_with = "bit_shift")]
    pub shift: u32,
}

impl FieldSpec {
    /// Extract this field's value from `frame`.
    ///
    /// Returns `None` when the byte offset is beyond the end of the frame.
    /// Out-of-range fields are deliberately omitted rather than treated as an
    /// error; callers must not substitute a default value.
    #[inline]
    pub fn extract(&self, frame: &[u8]) -> Option<u8> {
        frame.get(self.byte).map(|&b| (b & self.mask) >> self.shift)
    }
}

/// Deserialize a mask written as a hexadecimal string.
fn hex_mask<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(&raw);

    u8::from_str_radix(digits, 16)
        .map_err(|_| D::Error::custom(format!("mask {:?} is not a hexadecimal byte", raw)))
}

/// Deserialize a shift amount, rejecting values that cannot apply to a byte.
fn bit_shift<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let shift = u32::deserialize(deserializer)?;
    if shift > 7 {
        return Err(D::Error::custom(format!(
            "shift {} is out of range for a single byte",
            shift
        )));
    }
    Ok(shift)
}
