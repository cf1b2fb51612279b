//! # Key Registry Transitions
//!
//! Pure state transitions for a principal's key set. Each function takes
//! the stored record (if any) and returns the record to persist, or the
//! error that leaves storage untouched.
//!
//! Validation (`InvalidPrincipal`, `InvalidMerkleRoot`, `InvalidKeyCount`)
//! runs before the stored record is inspected.

use shared_types::{is_zero_address, is_zero_hash, Address, Hash, Timestamp};

use super::entities::QuantumKeySet;
use super::errors::VaultError;
use super::value_objects::REVOKE_COOLDOWN_SECS;

/// `total_keys` must be a non-zero power of two.
pub fn validate_key_count(total_keys: u64) -> Result<(), VaultError> {
    if total_keys == 0 || !total_keys.is_power_of_two() {
        return Err(VaultError::InvalidKeyCount { total_keys });
    }
    Ok(())
}

/// Reject the zero address as a principal or target.
pub fn validate_principal(principal: &Address) -> Result<(), VaultError> {
    if is_zero_address(principal) {
        return Err(VaultError::InvalidPrincipal);
    }
    Ok(())
}

fn validate_commitment(
    principal: &Address,
    merkle_root: &Hash,
    total_keys: u64,
) -> Result<(), VaultError> {
    validate_principal(principal)?;
    if is_zero_hash(merkle_root) {
        return Err(VaultError::InvalidMerkleRoot);
    }
    validate_key_count(total_keys)
}

/// Create a new active generation.
///
/// Legal when no record exists or the stored one is revoked.
pub fn register(
    existing: Option<&QuantumKeySet>,
    principal: &Address,
    merkle_root: Hash,
    total_keys: u64,
    now: Timestamp,
) -> Result<QuantumKeySet, VaultError> {
    validate_commitment(principal, &merkle_root, total_keys)?;

    let generation = match existing {
        Some(current) if current.active => {
            return Err(VaultError::DuplicateRegistration {
                principal: *principal,
            })
        }
        Some(revoked) => revoked.generation + 1,
        None => 1,
    };

    Ok(QuantumKeySet {
        merkle_root,
        total_keys,
        used_keys: 0,
        registered_at: now,
        active: true,
        generation,
    })
}

/// Replace the root of an active set and reset its counter.
///
/// The used-key ledger is not touched.
pub fn rotate(
    existing: Option<&QuantumKeySet>,
    principal: &Address,
    merkle_root: Hash,
    total_keys: u64,
    now: Timestamp,
) -> Result<QuantumKeySet, VaultError> {
    validate_commitment(principal, &merkle_root, total_keys)?;

    let current = active(existing, principal)?;
    Ok(QuantumKeySet {
        merkle_root,
        total_keys,
        used_keys: 0,
        registered_at: now,
        active: true,
        generation: current.generation + 1,
    })
}

/// Deactivate an active set once the cooldown has elapsed.
pub fn revoke(
    existing: Option<&QuantumKeySet>,
    principal: &Address,
    now: Timestamp,
) -> Result<QuantumKeySet, VaultError> {
    validate_principal(principal)?;

    let current = active(existing, principal)?;
    let unlocks_at = current.registered_at.saturating_add(REVOKE_COOLDOWN_SECS);
    if now < unlocks_at {
        return Err(VaultError::CooldownNotElapsed {
            remaining_secs: unlocks_at - now,
        });
    }

    Ok(QuantumKeySet {
        active: false,
        ..current.clone()
    })
}

/// Record one consumed key.
///
/// Callers must have passed the authorization checks, which guarantee
/// `used_keys < total_keys`.
pub fn consume(current: &QuantumKeySet) -> QuantumKeySet {
    QuantumKeySet {
        used_keys: current.used_keys.saturating_add(1).min(current.total_keys),
        ..current.clone()
    }
}

fn active<'a>(
    existing: Option<&'a QuantumKeySet>,
    principal: &Address,
) -> Result<&'a QuantumKeySet, VaultError> {
    match existing {
        Some(current) if current.active => Ok(current),
        _ => Err(VaultError::NoActiveKeySet {
            principal: *principal,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRINCIPAL: Address = [0x11; 20];
    const ROOT: Hash = [0xAA; 32];
    const NEW_ROOT: Hash = [0xBB; 32];
    const T0: Timestamp = 1_700_000_000;

    #[test]
    fn test_key_count_validation() {
        for valid in [1u64, 2, 8, 1024, 1 << 63] {
            assert!(validate_key_count(valid).is_ok(), "{} should pass", valid);
        }
        for invalid in [0u64, 3, 6, 1000, u64::MAX] {
            assert_eq!(
                validate_key_count(invalid),
                Err(VaultError::InvalidKeyCount {
                    total_keys: invalid
                })
            );
        }
    }

    #[test]
    fn test_register_fresh_principal() {
        let ks = register(None, &PRINCIPAL, ROOT, 8, T0).unwrap();
        assert_eq!(ks.total_keys, 8);
        assert_eq!(ks.used_keys, 0);
        assert_eq!(ks.registered_at, T0);
        assert!(ks.active);
        assert_eq!(ks.generation, 1);
    }

    #[test]
    fn test_register_rejects_zero_identifiers() {
        assert_eq!(
            register(None, &[0u8; 20], ROOT, 8, T0),
            Err(VaultError::InvalidPrincipal)
        );
        assert_eq!(
            register(None, &PRINCIPAL, [0u8; 32], 8, T0),
            Err(VaultError::InvalidMerkleRoot)
        );
    }

    #[test]
    fn test_validation_precedes_duplicate_check() {
        let ks = register(None, &PRINCIPAL, ROOT, 8, T0).unwrap();
        assert_eq!(
            register(Some(&ks), &PRINCIPAL, ROOT, 3, T0),
            Err(VaultError::InvalidKeyCount { total_keys: 3 })
        );
        assert_eq!(
            register(Some(&ks), &PRINCIPAL, ROOT, 8, T0),
            Err(VaultError::DuplicateRegistration {
                principal: PRINCIPAL
            })
        );
    }

    #[test]
    fn test_register_after_revoke_bumps_generation() {
        let ks = register(None, &PRINCIPAL, ROOT, 8, T0).unwrap();
        let revoked = revoke(Some(&ks), &PRINCIPAL, T0 + REVOKE_COOLDOWN_SECS).unwrap();
        let again = register(Some(&revoked), &PRINCIPAL, NEW_ROOT, 4, T0 + REVOKE_COOLDOWN_SECS)
            .unwrap();
        assert!(again.active);
        assert_eq!(again.generation, 2);
        assert_eq!(again.merkle_root, NEW_ROOT);
    }

    #[test]
    fn test_rotate_resets_counter() {
        let mut ks = register(None, &PRINCIPAL, ROOT, 8, T0).unwrap();
        ks.used_keys = 8;
        let rotated = rotate(Some(&ks), &PRINCIPAL, NEW_ROOT, 16, T0 + 60).unwrap();
        assert_eq!(rotated.used_keys, 0);
        assert_eq!(rotated.total_keys, 16);
        assert_eq!(rotated.merkle_root, NEW_ROOT);
        assert_eq!(rotated.registered_at, T0 + 60);
        assert_eq!(rotated.generation, 2);
    }

    #[test]
    fn test_rotate_requires_active_set() {
        assert_eq!(
            rotate(None, &PRINCIPAL, NEW_ROOT, 8, T0),
            Err(VaultError::NoActiveKeySet {
                principal: PRINCIPAL
            })
        );
        let ks = register(None, &PRINCIPAL, ROOT, 8, T0).unwrap();
        let revoked = revoke(Some(&ks), &PRINCIPAL, T0 + REVOKE_COOLDOWN_SECS).unwrap();
        assert!(matches!(
            rotate(Some(&revoked), &PRINCIPAL, NEW_ROOT, 8, T0),
            Err(VaultError::NoActiveKeySet { .. })
        ));
    }

    #[test]
    fn test_revoke_cooldown_boundary() {
        let ks = register(None, &PRINCIPAL, ROOT, 8, T0).unwrap();

        assert_eq!(
            revoke(Some(&ks), &PRINCIPAL, T0 + REVOKE_COOLDOWN_SECS - 1),
            Err(VaultError::CooldownNotElapsed { remaining_secs: 1 })
        );
        let revoked = revoke(Some(&ks), &PRINCIPAL, T0 + REVOKE_COOLDOWN_SECS).unwrap();
        assert!(!revoked.active);
        assert_eq!(revoked.remaining_keys(), 0);
    }

    #[test]
    fn test_rotate_restarts_cooldown() {
        let ks = register(None, &PRINCIPAL, ROOT, 8, T0).unwrap();
        let rotated = rotate(Some(&ks), &PRINCIPAL, NEW_ROOT, 8, T0 + REVOKE_COOLDOWN_SECS).unwrap();
        assert!(matches!(
            revoke(Some(&rotated), &PRINCIPAL, T0 + REVOKE_COOLDOWN_SECS),
            Err(VaultError::CooldownNotElapsed { .. })
        ));
    }

    #[test]
    fn test_revoke_twice_fails() {
        let ks = register(None, &PRINCIPAL, ROOT, 8, T0).unwrap();
        let revoked = revoke(Some(&ks), &PRINCIPAL, T0 + REVOKE_COOLDOWN_SECS).unwrap();
        assert!(matches!(
            revoke(Some(&revoked), &PRINCIPAL, T0 + 2 * REVOKE_COOLDOWN_SECS),
            Err(VaultError::NoActiveKeySet { .. })
        ));
    }

    #[test]
    fn test_consume_increments_and_saturates() {
        let ks = register(None, &PRINCIPAL, ROOT, 2, T0).unwrap();
        let once = consume(&ks);
        assert_eq!(once.used_keys, 1);
        let twice = consume(&once);
        assert_eq!(twice.used_keys, 2);
        assert!(twice.is_exhausted());
        assert_eq!(consume(&twice).used_keys, 2);
    }
}
