//! # Vault Errors
//!
//! Error types for the quantum authorization vault.
//!
//! ## Design Principles
//!
//! - Every operation outcome other than success is a typed variant
//! - Errors are grouped into the categories callers branch on
//!   (see [`ErrorCategory`])
//! - No error is produced after a partial mutation: validation and state
//!   checks run before the single atomic commit

use shared_types::{short_hex, Address, KeyIndex};
use thiserror::Error;

/// Errors returned by vault operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    // =========================================================================
    // Validation (rejected before any state read)
    // =========================================================================
    /// Key count is zero or not a power of two.
    #[error("Invalid key count {total_keys}: must be a non-zero power of two")]
    InvalidKeyCount { total_keys: u64 },

    /// The principal identity is the zero address.
    #[error("Invalid principal: zero address")]
    InvalidPrincipal,

    /// The Merkle root is the zero hash.
    #[error("Invalid Merkle root: zero hash")]
    InvalidMerkleRoot,

    // =========================================================================
    // State
    // =========================================================================
    /// An active key set already exists for this principal.
    #[error("Duplicate registration for principal {}", short_hex(.principal))]
    DuplicateRegistration { principal: Address },

    /// No active key set exists for this principal.
    #[error("No active key set for principal {}", short_hex(.principal))]
    NoActiveKeySet { principal: Address },

    /// Authorization attempted without an active key set.
    #[error("Key set inactive for principal {}", short_hex(.principal))]
    KeySetInactive { principal: Address },

    // =========================================================================
    // Replay
    // =========================================================================
    /// The one-time key at this index has already been consumed.
    #[error("Key {key_index} already used")]
    KeyAlreadyUsed { key_index: KeyIndex },

    // =========================================================================
    // Crypto
    // =========================================================================
    /// The Merkle proof does not reconstruct the registered root.
    #[error("Invalid Merkle proof")]
    InvalidProof,

    /// The revealed signature does not reconstruct the claimed leaf.
    #[error("Invalid one-time signature")]
    InvalidSignature,

    // =========================================================================
    // Exhaustion / Cooldown
    // =========================================================================
    /// Every key of the current generation has been consumed.
    #[error("All {total_keys} keys exhausted: rotate to a new key set")]
    KeysExhausted { total_keys: u64 },

    /// Revocation attempted before the mandatory delay elapsed.
    #[error("Revocation cooldown not elapsed: {remaining_secs}s remaining")]
    CooldownNotElapsed { remaining_secs: u64 },

    // =========================================================================
    // Authorization
    // =========================================================================
    /// The caller is not the owning authority.
    #[error("Unauthorized caller {}", short_hex(.caller))]
    Unauthorized { caller: Address },

    /// The persisted owner differs from the configured owner.
    #[error("Owner mismatch: store is owned by {}, configured {}", short_hex(.stored), short_hex(.configured))]
    OwnerMismatch {
        stored: Address,
        configured: Address,
    },

    // =========================================================================
    // Infrastructure
    // =========================================================================
    /// The key-value store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A persisted record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Error categories callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bad input, rejected before any state read.
    Validation,
    /// Operation illegal in the current key-set state.
    State,
    /// Key index already consumed. Never bypassable.
    Replay,
    /// Proof or signature mismatch.
    Crypto,
    /// Capacity limit: the principal must rotate.
    Exhaustion,
    /// Revocation attempted too early.
    Cooldown,
    /// Administrative caller is not the owner.
    Authorization,
    /// Storage or encoding failure.
    Infrastructure,
}

impl VaultError {
    /// The category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidKeyCount { .. } | Self::InvalidPrincipal | Self::InvalidMerkleRoot => {
                ErrorCategory::Validation
            }
            Self::DuplicateRegistration { .. }
            | Self::NoActiveKeySet { .. }
            | Self::KeySetInactive { .. } => ErrorCategory::State,
            Self::KeyAlreadyUsed { .. } => ErrorCategory::Replay,
            Self::InvalidProof | Self::InvalidSignature => ErrorCategory::Crypto,
            Self::KeysExhausted { .. } => ErrorCategory::Exhaustion,
            Self::CooldownNotElapsed { .. } => ErrorCategory::Cooldown,
            Self::Unauthorized { .. } | Self::OwnerMismatch { .. } => ErrorCategory::Authorization,
            Self::Storage(_) | Self::Serialization(_) => ErrorCategory::Infrastructure,
        }
    }
}

/// Error from key-value store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O failure in the backing store.
    #[error("I/O error: {message}")]
    IOError { message: String },

    /// The backing store is corrupt or unreadable.
    #[error("Corrupted store: {message}")]
    Corrupted { message: String },

    /// Another process holds the store's exclusive lock.
    #[error("Store already in use: {path}")]
    AlreadyLocked { path: String },
}

impl From<KVStoreError> for VaultError {
    fn from(err: KVStoreError) -> Self {
        VaultError::Storage(err.to_string())
    }
}

impl From<bincode::Error> for VaultError {
    fn from(err: bincode::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            VaultError::InvalidKeyCount { total_keys: 3 }.category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            VaultError::KeyAlreadyUsed { key_index: 1 }.category(),
            ErrorCategory::Replay
        );
        assert_eq!(VaultError::InvalidProof.category(), ErrorCategory::Crypto);
        assert_eq!(
            VaultError::KeysExhausted { total_keys: 8 }.category(),
            ErrorCategory::Exhaustion
        );
        assert_eq!(
            VaultError::CooldownNotElapsed { remaining_secs: 5 }.category(),
            ErrorCategory::Cooldown
        );
        assert_eq!(
            VaultError::Storage("disk".into()).category(),
            ErrorCategory::Infrastructure
        );
    }

    #[test]
    fn test_display_includes_context() {
        let err = VaultError::InvalidKeyCount { total_keys: 12 };
        assert!(err.to_string().contains("12"));

        let err = VaultError::DuplicateRegistration {
            principal: [0xAB; 20],
        };
        assert!(err.to_string().contains("0xabababab"));
    }

    #[test]
    fn test_kv_error_converts_to_storage() {
        let err: VaultError = KVStoreError::IOError {
            message: "disk gone".into(),
        }
        .into();
        assert!(matches!(err, VaultError::Storage(ref m) if m.contains("disk gone")));
    }
}
