//! # Protection Configuration
//!
//! Owner guard and record encoding for the administrative settings:
//! per-target "requires quantum authorization" flags and the value
//! threshold. The vault stores these for callers and never enforces them.

use shared_types::{is_zero_address, Address};

use super::errors::VaultError;

/// Guard clause run first by every administrative operation.
///
/// The zero address is never an owner, even when no owner was configured.
pub fn ensure_owner(caller: &Address, owner: &Address) -> Result<(), VaultError> {
    if is_zero_address(caller) || caller != owner {
        return Err(VaultError::Unauthorized { caller: *caller });
    }
    Ok(())
}

/// Stored byte for a target flag.
pub fn encode_flag(protected: bool) -> Vec<u8> {
    vec![u8::from(protected)]
}

/// Decode a target flag; a missing record reads as unprotected.
pub fn decode_flag(bytes: Option<&[u8]>) -> Result<bool, VaultError> {
    match bytes {
        None => Ok(false),
        Some([0]) => Ok(false),
        Some([1]) => Ok(true),
        Some(other) => Err(VaultError::Serialization(format!(
            "invalid protected-target flag: {:?}",
            other
        ))),
    }
}

/// Decode a stored owner address.
pub fn decode_owner(bytes: &[u8]) -> Result<Address, VaultError> {
    bytes.try_into().map_err(|_| {
        VaultError::Serialization(format!("owner record has {} bytes, expected 20", bytes.len()))
    })
}
