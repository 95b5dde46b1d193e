//! Utilities used in this crate which can also be generally useful downstream.

use alloc::string::{String, ToString};
use core::fmt::Write;

use thiserror::Error;
pub use winter_utils::{
    ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable, SliceReader,
};

// UTILITY FUNCTIONS
// ================================================================================================

/// Renders an array of bytes as hex into a String.
pub fn bytes_to_hex_string<const N: usize>(data: [u8; N]) -> String {
    let mut s = String::with_capacity(N * 2 + 2);

    s.push_str("0x");
    for byte in data.iter() {
        write!(s, "{byte:02x}").expect("formatting hex failed");
    }

    s
}

/// Defines errors which can occur during parsing of hexadecimal strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HexParseError {
    #[error("expected hex data to have length {expected}, including the 0x prefix, found {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("hex encoded data must start with 0x prefix")]
    MissingPrefix,
    #[error("hex encoded data must contain only characters [0-9a-fA-F]")]
    InvalidChar,
    #[error("hex encoded bytes are not a valid digest: {0}")]
    InvalidDigest(String),
}

/// Parses a hex string into an array of bytes of known size.
pub fn hex_to_bytes<const N: usize>(value: &str) -> Result<[u8; N], HexParseError> {
    let expected: usize = (N * 2) + 2;
    if value.len() != expected {
        return Err(HexParseError::InvalidLength { expected, actual: value.len() });
    }

    let Some(digits) = value.strip_prefix("0x") else {
        return Err(HexParseError::MissingPrefix);
    };

    let mut data = [0u8; N];
    for (byte, pair) in data.iter_mut().zip(digits.as_bytes().chunks_exact(2)) {
        *byte = (decode_hex_digit(pair[0])? << 4) | decode_hex_digit(pair[1])?;
    }

    Ok(data)
}

/// Parses a `0x`-prefixed, 32-byte hex string into any value decodable from those bytes.
pub fn hex_to_value<T: Deserializable>(value: &str) -> Result<T, HexParseError> {
    let bytes = hex_to_bytes::<32>(value)?;
    T::read_from_bytes(&bytes).map_err(|err| HexParseError::InvalidDigest(err.to_string()))
}

fn decode_hex_digit(digit: u8) -> Result<u8, HexParseError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(HexParseError::InvalidChar),
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn hex_roundtrip() {
        let data: [u8; 4] = [0x00, 0x1c, 0xab, 0xff];
        let encoded = bytes_to_hex_string(data);
        assert_eq!(encoded, "0x001cabff");
        assert_eq!(hex_to_bytes::<4>(&encoded).unwrap(), data);
        assert_eq!(hex_to_bytes::<4>("0x001CABFF").unwrap(), data);
        assert_eq!(hex::encode(data), encoded[2..]);
    }

    #[test]
    fn hex_parse_errors() {
        assert_matches!(
            hex_to_bytes::<2>("0x00"),
            Err(HexParseError::InvalidLength { expected: 6, actual: 4 })
        );
        assert_matches!(hex_to_bytes::<2>("000000"), Err(HexParseError::MissingPrefix));
        assert_matches!(hex_to_bytes::<2>("0x00zz"), Err(HexParseError::InvalidChar));
    }
}
