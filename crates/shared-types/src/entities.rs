//! # Core Identifiers
//!
//! Fixed-size identifiers used by every vault component.
//!
//! ## Clusters
//!
//! - **Commitments**: `Hash` (Merkle roots, leaves, message digests)
//! - **Identity**: `Address` (principals and protected targets)
//! - **Accounting**: `KeyIndex`, `Timestamp`, `U256` values

// Re-export U256 from primitive-types for value thresholds
pub use primitive_types::U256;

/// A 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
///
/// Principals (key-set owners), protected targets and the administrative
/// owner are all identified by addresses.
pub type Address = [u8; 20];

/// Seconds since the unix epoch.
pub type Timestamp = u64;

/// Position of a one-time key within its generation's committed set.
pub type KeyIndex = u64;

/// The all-zero hash. Never a valid Merkle root.
pub const ZERO_HASH: Hash = [0u8; 32];

/// The all-zero address. Never a valid principal or owner.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Returns `true` if every byte of the hash is zero.
#[inline]
pub fn is_zero_hash(hash: &Hash) -> bool {
    hash.iter().all(|b| *b == 0)
}

/// Returns `true` if every byte of the address is zero.
#[inline]
pub fn is_zero_address(address: &Address) -> bool {
    address.iter().all(|b| *b == 0)
}

/// Short hex prefix for log lines (`0x1a2b3c4d…`).
pub fn short_hex(bytes: &[u8]) -> String {
    let end = bytes.len().min(4);
    format!("0x{}…", hex::encode(&bytes[..end]))
}
