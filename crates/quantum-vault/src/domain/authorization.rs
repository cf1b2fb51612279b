//! # Authorization Checks
//!
//! The decision logic of the authorization gate, split in two phases so the
//! service can read state under a lock and run the hashing outside it.
//!
//! ## Check Order
//!
//! 1. `KeySetInactive` - no record, or revoked
//! 2. `KeysExhausted` - `used_keys >= total_keys`
//! 3. `KeyAlreadyUsed` - ledger entry present
//! 4. `InvalidProof` - leaf not included under the root at `key_index`
//! 5. `InvalidSignature` - reconstruction differs from the claimed leaf
//!
//! Replay is checked before any crypto, so a consumed index is rejected no
//! matter which proof or signature accompanies it.

use shared_types::Address;

use super::entities::{AuthorizationRequest, QuantumKeySet};
use super::errors::VaultError;
use super::merkle::ProofVerifier;
use super::signature::SignatureReconstructor;

/// State checks against a consistent snapshot of the key set and ledger entry.
pub fn check_state<'a>(
    principal: &Address,
    key_set: Option<&'a QuantumKeySet>,
    key_index_used: bool,
    key_index: u64,
) -> Result<&'a QuantumKeySet, VaultError> {
    let key_set = match key_set {
        Some(ks) if ks.active => ks,
        _ => {
            return Err(VaultError::KeySetInactive {
                principal: *principal,
            })
        }
    };

    if key_set.is_exhausted() {
        return Err(VaultError::KeysExhausted {
            total_keys: key_set.total_keys,
        });
    }

    if key_index_used {
        return Err(VaultError::KeyAlreadyUsed { key_index });
    }

    Ok(key_set)
}

/// Proof and signature checks. Pure; needs no store access.
pub fn check_crypto<R: SignatureReconstructor>(
    key_set: &QuantumKeySet,
    request: &AuthorizationRequest<R::Signature>,
    reconstructor: &R,
) -> Result<(), VaultError> {
    if !ProofVerifier::verify_for_key_set(
        &request.leaf_hash,
        request.key_index,
        &request.proof,
        &key_set.merkle_root,
        key_set.total_keys,
    ) {
        return Err(VaultError::InvalidProof);
    }

    match reconstructor.reconstruct(&request.message_digest, &request.signature) {
        Some(leaf) if leaf == request.leaf_hash => Ok(()),
        _ => Err(VaultError::InvalidSignature),
    }
}
