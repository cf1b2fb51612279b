//! Concurrent consumption: a key index is accepted exactly once.

mod common;

use common::{KeyMaterial, ALICE, BOB, OWNER};
use quantum_vault::{QuantumAuthApi, QuantumVaultService, VaultConfig, VaultError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;

const THREADS: usize = 8;

#[test]
fn test_same_index_consumed_once() {
    let vault = QuantumVaultService::new_in_memory(VaultConfig::new().with_owner(OWNER)).unwrap();
    let keys = KeyMaterial::generate(16, 1);
    vault.register(ALICE, keys.root(), 16).unwrap();

    let request = keys.request(ALICE, 5);
    let accepted = AtomicUsize::new(0);
    let replayed = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    std::thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                barrier.wait();
                match vault.verify_and_consume(&request) {
                    Ok(true) => accepted.fetch_add(1, Ordering::SeqCst),
                    Err(VaultError::KeyAlreadyUsed { key_index: 5 }) => {
                        replayed.fetch_add(1, Ordering::SeqCst)
                    }
                    other => panic!("unexpected outcome: {:?}", other),
                };
            });
        }
    });

    assert_eq!(accepted.load(Ordering::SeqCst), 1);
    assert_eq!(replayed.load(Ordering::SeqCst), THREADS - 1);
    assert_eq!(vault.get_key_set(&ALICE).unwrap().unwrap().used_keys, 1);
}

#[test]
fn test_distinct_indices_all_counted() {
    let vault = QuantumVaultService::new_in_memory(VaultConfig::new().with_owner(OWNER)).unwrap();
    let keys = KeyMaterial::generate(32, 2);
    vault.register(ALICE, keys.root(), 32).unwrap();

    std::thread::scope(|s| {
        for t in 0..4u64 {
            let vault = &vault;
            let keys = &keys;
            s.spawn(move || {
                for index in (t * 8)..(t * 8 + 8) {
                    assert_eq!(vault.verify_and_consume(&keys.request(ALICE, index)), Ok(true));
                }
            });
        }
    });

    let ks = vault.get_key_set(&ALICE).unwrap().unwrap();
    assert_eq!(ks.used_keys, 32);
    assert_eq!(vault.used_key_indices(&ALICE).unwrap(), (0..32).collect::<Vec<_>>());
}

#[test]
fn test_readers_run_alongside_other_principal() {
    let vault = QuantumVaultService::new_in_memory(VaultConfig::new().with_owner(OWNER)).unwrap();
    let alice_keys = KeyMaterial::generate(8, 3);
    let bob_keys = KeyMaterial::generate(8, 4);
    vault.register(ALICE, alice_keys.root(), 8).unwrap();
    vault.register(BOB, bob_keys.root(), 8).unwrap();

    std::thread::scope(|s| {
        s.spawn(|| {
            for index in 0..8 {
                vault
                    .verify_and_consume(&bob_keys.request(BOB, index))
                    .unwrap();
            }
        });
        s.spawn(|| {
            for _ in 0..50 {
                assert_eq!(vault.verify(&alice_keys.request(ALICE, 2)), Ok(true));
            }
        });
    });

    assert_eq!(vault.remaining_keys(&ALICE).unwrap(), 8);
    assert_eq!(vault.remaining_keys(&BOB).unwrap(), 0);
}
