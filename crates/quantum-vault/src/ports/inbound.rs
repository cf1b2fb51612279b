//! # Inbound Ports (Driving Ports)
//!
//! The public API of the quantum authorization vault.
//!
//! All operations are synchronous and all-or-nothing: a call either commits
//! fully or fails with a typed error and no side effects.

use shared_types::{Address, Hash, KeyIndex, U256};

use crate::domain::entities::{AuthorizationRequest, KeySetStatus, QuantumKeySet};
use crate::domain::errors::VaultError;

/// Key registry and authorization gate.
///
/// Methods take `&self`: implementations serialize mutations per principal
/// internally so the API can be shared across threads.
pub trait QuantumAuthApi {
    /// Signature type accepted by `verify` / `verify_and_consume`.
    type Signature;

    /// Register a key set for a principal with no active set.
    ///
    /// ## Errors
    ///
    /// - `InvalidPrincipal`, `InvalidMerkleRoot`: zero identifiers
    /// - `InvalidKeyCount`: `total_keys` is zero or not a power of two
    /// - `DuplicateRegistration`: an active set already exists
    fn register(
        &self,
        principal: Address,
        merkle_root: Hash,
        total_keys: u64,
    ) -> Result<(), VaultError>;

    /// Replace an active set's root and reset its usage counter.
    ///
    /// Consumed-key ledger entries of earlier generations stay in place.
    ///
    /// ## Errors
    ///
    /// - `InvalidKeyCount` (and zero-identifier validation)
    /// - `NoActiveKeySet`
    fn rotate(&self, principal: Address, merkle_root: Hash, total_keys: u64)
        -> Result<(), VaultError>;

    /// Deactivate an active set once 7 days have passed since its
    /// (re)registration or last rotation.
    ///
    /// ## Errors
    ///
    /// - `NoActiveKeySet`
    /// - `CooldownNotElapsed`
    fn revoke(&self, principal: Address) -> Result<(), VaultError>;

    /// Read-only authorization check.
    ///
    /// ## Errors (in check order)
    ///
    /// `KeySetInactive`, `KeysExhausted`, `KeyAlreadyUsed`, `InvalidProof`,
    /// `InvalidSignature`.
    fn verify(&self, request: &AuthorizationRequest<Self::Signature>) -> Result<bool, VaultError>;

    /// Check and, on success, atomically mark the key used and increment
    /// the usage counter.
    ///
    /// Same error set as [`verify`](Self::verify). No two concurrent calls
    /// can both pass the replay check for the same `(principal, key_index)`.
    fn verify_and_consume(
        &self,
        request: &AuthorizationRequest<Self::Signature>,
    ) -> Result<bool, VaultError>;

    /// `true` if the principal has an active key set.
    fn has_protection(&self, principal: &Address) -> Result<bool, VaultError>;

    /// Unused keys in the active generation (0 when none).
    fn remaining_keys(&self, principal: &Address) -> Result<u64, VaultError>;

    /// Snapshot of the stored record.
    fn get_key_set(&self, principal: &Address) -> Result<Option<QuantumKeySet>, VaultError>;

    /// Lifecycle status of the principal's key set.
    fn key_status(&self, principal: &Address) -> Result<KeySetStatus, VaultError>;

    /// `true` if the ledger has an entry for `(principal, key_index)`.
    fn is_key_used(&self, principal: &Address, key_index: KeyIndex) -> Result<bool, VaultError>;

    /// Every consumed index recorded for the principal, ascending.
    fn used_key_indices(&self, principal: &Address) -> Result<Vec<KeyIndex>, VaultError>;
}

/// Administrative settings, gated by the single owning authority.
///
/// The vault stores these for external collaborators; it does not enforce
/// them itself.
pub trait ProtectionConfigApi {
    /// Mark a target as requiring quantum authorization (or clear it).
    ///
    /// ## Errors
    ///
    /// - `Unauthorized`: `caller` is not the owner, or is the zero address
    /// - `InvalidPrincipal`: `target` is the zero address
    fn set_protected_target(
        &self,
        caller: Address,
        target: Address,
        protected: bool,
    ) -> Result<(), VaultError>;

    /// Set the value threshold above which callers demand authorization.
    ///
    /// ## Errors
    ///
    /// - `Unauthorized`: `caller` is not the owner, or is the zero address
    fn set_threshold(&self, caller: Address, threshold: U256) -> Result<(), VaultError>;

    /// `true` if the target is flagged.
    fn is_protected_target(&self, target: &Address) -> Result<bool, VaultError>;

    /// Current threshold (zero if never set).
    fn threshold(&self) -> Result<U256, VaultError>;

    /// The owning authority.
    fn owner(&self) -> Address;
}
