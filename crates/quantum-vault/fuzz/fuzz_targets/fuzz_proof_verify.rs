//! Fuzz target for Merkle inclusion verification.
//!
//! Arbitrary leaves, indices, proofs and key counts must never panic, and
//! the bounded check must never accept what the plain fold rejects.
//!
//! ## Running
//!
//! ```bash
//! cd crates/quantum-vault
//! cargo +nightly fuzz run fuzz_proof_verify
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use quantum_vault::ProofVerifier;

#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzInput {
    leaf: [u8; 32],
    index: u64,
    proof: Vec<[u8; 32]>,
    root: [u8; 32],
    total_keys: u64,
}

fuzz_target!(|input: FuzzInput| {
    let plain = ProofVerifier::verify(&input.leaf, input.index, &input.proof, &input.root);
    let bounded = ProofVerifier::verify_for_key_set(
        &input.leaf,
        input.index,
        &input.proof,
        &input.root,
        input.total_keys,
    );

    if bounded {
        assert!(plain);
        assert!(input.index < input.total_keys);
        assert_eq!(input.proof.len(), input.total_keys.trailing_zeros() as usize);
    }

    // Deterministic.
    assert_eq!(
        plain,
        ProofVerifier::verify(&input.leaf, input.index, &input.proof, &input.root)
    );
});
