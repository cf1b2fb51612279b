//! # Hex Codec
//!
//! Parsing of fixed-size identifiers from text. Used by the runtime for
//! environment variables, CLI flags and JSON request files.

use thiserror::Error;

use crate::entities::{Address, Hash};

/// Errors from decoding hex text into fixed-size identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexDecodeError {
    /// The input is not valid hexadecimal.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// The decoded input has the wrong number of bytes.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Decode hex text (optional `0x` prefix) into exactly `N` bytes.
pub fn decode_fixed<const N: usize>(input: &str) -> Result<[u8; N], HexDecodeError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = hex::decode(digits).map_err(|e| HexDecodeError::InvalidHex(e.to_string()))?;
    if bytes.len() != N {
        return Err(HexDecodeError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }

    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Decode a 32-byte hash.
pub fn hash_from_hex(input: &str) -> Result<Hash, HexDecodeError> {
    decode_fixed::<32>(input)
}

/// Decode a 20-byte address.
pub fn address_from_hex(input: &str) -> Result<Address, HexDecodeError> {
    decode_fixed::<20>(input)
}

/// Encode bytes as `0x`-prefixed lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
