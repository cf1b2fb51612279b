//! Fuzz target for signature reconstruction.
//!
//! Both schemes must be total: no input panics, and malformed Lamport
//! signatures reconstruct to nothing.
//!
//! ## Running
//!
//! ```bash
//! cd crates/quantum-vault
//! cargo +nightly fuzz run fuzz_reconstruct
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use quantum_vault::{
    ChunkCommitmentReconstructor, LamportReconstructor, LamportSignature, OneTimeSignature,
    SignatureReconstructor, LAMPORT_BITS,
};

#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzInput {
    digest: [u8; 32],
    chunks: [[u8; 32]; 32],
    selectors: [u8; 32],
    revealed: Vec<[u8; 32]>,
    complements: Vec<[u8; 32]>,
}

fuzz_target!(|input: FuzzInput| {
    let chunk_sig = OneTimeSignature::new(input.chunks, input.selectors);
    let a = ChunkCommitmentReconstructor.reconstruct(&input.digest, &chunk_sig);
    let b = ChunkCommitmentReconstructor.reconstruct(&input.digest, &chunk_sig);
    assert!(a.is_some());
    assert_eq!(a, b);

    let well_formed =
        input.revealed.len() == LAMPORT_BITS && input.complements.len() == LAMPORT_BITS;
    let lamport_sig = LamportSignature {
        revealed: input.revealed,
        complements: input.complements,
    };
    let leaf = LamportReconstructor.reconstruct(&input.digest, &lamport_sig);
    assert_eq!(leaf.is_some(), well_formed);
});
