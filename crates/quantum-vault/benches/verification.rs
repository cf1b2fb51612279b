//! # Verification Hot-Path Benchmarks
//!
//! - Proof verification at depths 3 / 10 / 20
//! - Chunk-commitment and Lamport reconstruction
//! - Full `verify` and `verify_and_consume` through the service
//!
//! ```bash
//! cargo bench --package quantum-vault --bench verification
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quantum_vault::{
    keccak256, AuthorizationRequest, ChunkCommitmentReconstructor, LamportReconstructor,
    LamportSignature, MerkleTree, OneTimeSignature, ProofVerifier, QuantumAuthApi,
    QuantumVaultService, SignatureReconstructor, VaultConfig, CHUNKS, LAMPORT_BITS,
};
use rand::Rng;

fn random_hash(rng: &mut impl Rng) -> [u8; 32] {
    let mut h = [0u8; 32];
    rng.fill(&mut h);
    h
}

fn random_signature(rng: &mut impl Rng) -> OneTimeSignature {
    let mut chunks = [[0u8; 32]; CHUNKS];
    let mut selectors = [0u8; CHUNKS];
    for c in 0..CHUNKS {
        chunks[c] = random_hash(rng);
        selectors[c] = rng.gen();
    }
    OneTimeSignature::new(chunks, selectors)
}

fn bench_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("vault/proof_verify");
    let mut rng = rand::thread_rng();

    for depth in [3u32, 10, 20] {
        // A single path is all verification needs: fold random siblings.
        let leaf = random_hash(&mut rng);
        let proof: Vec<[u8; 32]> = (0..depth).map(|_| random_hash(&mut rng)).collect();
        let index = rng.gen_range(0..(1u64 << depth));
        let root = ProofVerifier::compute_root(&leaf, index, &proof);

        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                ProofVerifier::verify_for_key_set(
                    black_box(&leaf),
                    black_box(index),
                    black_box(&proof),
                    &root,
                    1u64 << depth,
                )
            })
        });
    }
    group.finish();
}

fn bench_reconstruction(c: &mut Criterion) {
    let mut group = c.benchmark_group("vault/reconstruct");
    let mut rng = rand::thread_rng();
    let digest = random_hash(&mut rng);

    let chunk_sig = random_signature(&mut rng);
    group.bench_function("chunk_commitment", |b| {
        b.iter(|| ChunkCommitmentReconstructor.reconstruct(black_box(&digest), black_box(&chunk_sig)))
    });

    let lamport_sig = LamportSignature {
        revealed: (0..LAMPORT_BITS).map(|_| random_hash(&mut rng)).collect(),
        complements: (0..LAMPORT_BITS).map(|_| random_hash(&mut rng)).collect(),
    };
    group.bench_function("lamport", |b| {
        b.iter(|| LamportReconstructor.reconstruct(black_box(&digest), black_box(&lamport_sig)))
    });
    group.finish();
}

fn bench_service(c: &mut Criterion) {
    let mut group = c.benchmark_group("vault/service");
    let mut rng = rand::thread_rng();
    let principal = [0xA1; 20];
    let total_keys = 1u64 << 10;

    let digests: Vec<[u8; 32]> = (0..total_keys).map(|_| random_hash(&mut rng)).collect();
    let signatures: Vec<OneTimeSignature> =
        (0..total_keys).map(|_| random_signature(&mut rng)).collect();
    let leaves = digests
        .iter()
        .zip(&signatures)
        .map(|(d, s)| ChunkCommitmentReconstructor::commitment(d, s))
        .collect();
    let tree = match MerkleTree::build(leaves) {
        Ok(tree) => tree,
        Err(e) => panic!("tree build failed: {}", e),
    };
    let request = |index: u64| AuthorizationRequest {
        principal,
        message_digest: digests[index as usize],
        key_index: index,
        leaf_hash: tree.leaf(index).unwrap_or_default(),
        proof: tree.proof(index).unwrap_or_default(),
        signature: signatures[index as usize].clone(),
    };

    let vault = QuantumVaultService::new_in_memory(VaultConfig::new().with_owner([0x0A; 20]))
        .expect("in-memory vault");
    vault
        .register(principal, tree.root(), total_keys)
        .expect("register");

    let probe = request(7);
    group.bench_function("verify", |b| b.iter(|| vault.verify(black_box(&probe))));

    group.bench_function("register_consume_8", |b| {
        b.iter(|| {
            let fresh = QuantumVaultService::new_in_memory(VaultConfig::new().with_owner([0x0A; 20]))
                .expect("in-memory vault");
            fresh
                .register(principal, tree.root(), total_keys)
                .expect("register");
            for index in 0..8 {
                let _ = fresh.verify_and_consume(&request(index));
            }
        })
    });

    group.bench_function("keccak256_64b", |b| {
        let data = [0x5Au8; 64];
        b.iter(|| keccak256(black_box(&data)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_proof_verification,
    bench_reconstruction,
    bench_service
);
criterion_main!(benches);
