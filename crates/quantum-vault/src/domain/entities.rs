//! # Domain Entities
//!
//! Core domain entities for the quantum authorization vault.
//!
//! - `QuantumKeySet`: one persisted record per principal
//! - `OneTimeSignature`: ephemeral, consumed within a single verification
//! - `AuthorizationRequest`: the argument bundle of `verify` / `verify_and_consume`
//! - `VaultEvent`: signals emitted after each committed mutation

use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, KeyIndex, Timestamp, U256};

use super::value_objects::CHUNKS;

/// A principal's committed set of one-time keys.
///
/// ## Invariants
///
/// - `total_keys` is a non-zero power of two
/// - `used_keys <= total_keys`, non-decreasing while the set is active
/// - at most one record per principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumKeySet {
    /// Root committing to `total_keys` one-time public-key hashes.
    pub merkle_root: Hash,
    /// Number of keys in the generation.
    pub total_keys: u64,
    /// Keys consumed in the current generation.
    pub used_keys: u64,
    /// Creation time of the current generation.
    pub registered_at: Timestamp,
    /// `false` once revoked.
    pub active: bool,
    /// Generation counter: 1 on first registration, +1 per rotate / re-register.
    pub generation: u64,
}

impl QuantumKeySet {
    /// Keys left for consumption (0 when inactive).
    pub fn remaining_keys(&self) -> u64 {
        if !self.active {
            return 0;
        }
        self.total_keys.saturating_sub(self.used_keys)
    }

    /// Returns `true` if every key of the generation has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.used_keys >= self.total_keys
    }

    /// Depth of a valid inclusion proof: `log2(total_keys)`.
    pub fn proof_depth(&self) -> usize {
        self.total_keys.trailing_zeros() as usize
    }

    /// Lifecycle status of this record.
    pub fn status(&self) -> KeySetStatus {
        if !self.active {
            KeySetStatus::Inactive
        } else if self.is_exhausted() {
            KeySetStatus::Exhausted
        } else {
            KeySetStatus::Active
        }
    }
}

/// Lifecycle of a principal's key set.
///
/// ```text
/// UNREGISTERED ──register──→ ACTIVE ──last key consumed──→ EXHAUSTED
///                            ↑  ↑                              │
///                            │  └───────────rotate─────────────┘
///                         register
///                            │
///                         INACTIVE ←──revoke── ACTIVE | EXHAUSTED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeySetStatus {
    /// No record exists.
    Unregistered,
    /// Live and has unused keys.
    Active,
    /// Live but every key is consumed; only `rotate` or `revoke` apply.
    Exhausted,
    /// Revoked.
    Inactive,
}

/// A revealed one-time signature.
///
/// Never persisted: it lives only for the duration of one verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneTimeSignature {
    /// Revealed chunk values, one per digest byte.
    pub chunks: [Hash; CHUNKS],
    /// Declared selector index per chunk.
    pub selectors: [u8; CHUNKS],
}

impl OneTimeSignature {
    /// Create a signature from revealed chunks and selectors.
    pub fn new(chunks: [Hash; CHUNKS], selectors: [u8; CHUNKS]) -> Self {
        Self { chunks, selectors }
    }
}

/// Arguments of an authorization attempt.
///
/// Generic over the signature type so an alternative reconstruction
/// scheme can be plugged in without touching the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRequest<S> {
    /// The principal whose key set authorizes the operation.
    pub principal: Address,
    /// Digest of the operation being authorized.
    pub message_digest: Hash,
    /// Index of the one-time key being revealed.
    pub key_index: KeyIndex,
    /// Claimed leaf (one-time public-key commitment) at `key_index`.
    pub leaf_hash: Hash,
    /// Sibling hashes from leaf to root.
    pub proof: Vec<Hash>,
    /// The revealed signature.
    pub signature: S,
}

/// Signals emitted after a committed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultEvent {
    /// A principal registered a new key set.
    KeySetRegistered {
        principal: Address,
        merkle_root: Hash,
        total_keys: u64,
        generation: u64,
    },
    /// A principal replaced its key set.
    KeySetRotated {
        principal: Address,
        merkle_root: Hash,
        total_keys: u64,
        generation: u64,
    },
    /// A principal's key set was deactivated.
    KeySetRevoked { principal: Address, generation: u64 },
    /// A one-time key was consumed.
    KeyConsumed {
        principal: Address,
        key_index: KeyIndex,
        remaining_keys: u64,
    },
    /// The last key of a generation was consumed.
    KeysExhausted { principal: Address, generation: u64 },
    /// A target's protection flag changed.
    ProtectedTargetUpdated { target: Address, protected: bool },
    /// The value threshold changed.
    ThresholdUpdated { threshold: U256 },
}
