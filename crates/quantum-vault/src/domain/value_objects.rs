//! # Value Objects
//!
//! Constants, configuration and storage key layout for the vault.

use serde::{Deserialize, Serialize};
use shared_types::{Address, KeyIndex, ZERO_ADDRESS};

/// Mandatory delay between (re)registration and revocation: 7 days.
///
/// Prevents an attacker holding a compromised session from disabling
/// quantum protection mid-attack.
pub const REVOKE_COOLDOWN_SECS: u64 = 7 * 24 * 60 * 60;

/// Number of revealed chunks in a [`OneTimeSignature`](super::OneTimeSignature):
/// one per byte of the 32-byte message digest.
pub const CHUNKS: usize = 32;

/// Number of digest bits signed by the hardened Lamport scheme.
pub const LAMPORT_BITS: usize = 256;

/// Deepest proof accepted: `total_keys` is a `u64` power of two.
pub const MAX_PROOF_DEPTH: usize = 63;

/// Marker value stored for a consumed ledger entry.
pub const USED_MARKER: [u8; 1] = [1];

/// Configuration for the vault service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// The single owning authority for administrative operations.
    pub owner: Address,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            owner: ZERO_ADDRESS, // MUST be overridden in production
        }
    }
}

impl VaultConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the owning authority.
    pub fn with_owner(mut self, owner: Address) -> Self {
        self.owner = owner;
        self
    }
}

/// Key prefixes for the key-value store.
///
/// All keys are prefixed to namespace different record types.
pub struct KeyPrefix;

impl KeyPrefix {
    /// Principal → `QuantumKeySet`.
    pub const KEY_SET: &'static [u8] = b"ks:";
    /// (Principal, key index) → consumed marker.
    pub const USED_KEY: &'static [u8] = b"ul:";
    /// Target → protected flag.
    pub const PROTECTED_TARGET: &'static [u8] = b"pt:";
    /// Value threshold.
    pub const THRESHOLD: &'static [u8] = b"cfg:threshold";
    /// Owning authority.
    pub const OWNER: &'static [u8] = b"cfg:owner";

    /// Key for a principal's key-set record.
    pub fn key_set_key(principal: &Address) -> Vec<u8> {
        let mut key = Vec::with_capacity(Self::KEY_SET.len() + 20);
        key.extend_from_slice(Self::KEY_SET);
        key.extend_from_slice(principal);
        key
    }

    /// Key for a ledger entry.
    ///
    /// The index is big-endian so a prefix scan over one principal returns
    /// entries in index order.
    pub fn used_key_key(principal: &Address, key_index: KeyIndex) -> Vec<u8> {
        let mut key = Vec::with_capacity(Self::USED_KEY.len() + 28);
        key.extend_from_slice(Self::USED_KEY);
        key.extend_from_slice(principal);
        key.extend_from_slice(&key_index.to_be_bytes());
        key
    }

    /// Prefix covering every ledger entry of one principal.
    pub fn used_key_prefix(principal: &Address) -> Vec<u8> {
        let mut key = Vec::with_capacity(Self::USED_KEY.len() + 20);
        key.extend_from_slice(Self::USED_KEY);
        key.extend_from_slice(principal);
        key
    }

    /// Key for a protected-target flag.
    pub fn protected_target_key(target: &Address) -> Vec<u8> {
        let mut key = Vec::with_capacity(Self::PROTECTED_TARGET.len() + 20);
        key.extend_from_slice(Self::PROTECTED_TARGET);
        key.extend_from_slice(target);
        key
    }
}
