//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use quantum_vault::{
    keccak256, AuthorizationRequest, ChunkCommitmentReconstructor, MerkleTree, OneTimeSignature,
    CHUNKS,
};
use shared_types::{Address, Hash};

pub const OWNER: [u8; 20] = [0x0A; 20];
pub const ALICE: [u8; 20] = [0xA1; 20];
pub const BOB: [u8; 20] = [0xB0; 20];

/// One generation of one-time keys whose leaves commit to fixed digests.
pub struct KeyMaterial {
    pub tree: MerkleTree,
    pub digests: Vec<Hash>,
    pub signatures: Vec<OneTimeSignature>,
}

impl KeyMaterial {
    pub fn generate(total_keys: u64, seed: u8) -> Self {
        let digests: Vec<Hash> = (0..total_keys)
            .map(|i| keccak256(&[b'd', seed, i as u8, (i >> 8) as u8]))
            .collect();
        let signatures: Vec<OneTimeSignature> = (0..total_keys)
            .map(|i| {
                let mut chunks = [[0u8; 32]; CHUNKS];
                let mut selectors = [0u8; CHUNKS];
                for c in 0..CHUNKS {
                    chunks[c] = keccak256(&[b's', seed, i as u8, (i >> 8) as u8, c as u8]);
                    selectors[c] = chunks[c][0] & 1;
                }
                OneTimeSignature::new(chunks, selectors)
            })
            .collect();
        let leaves = digests
            .iter()
            .zip(&signatures)
            .map(|(d, s)| ChunkCommitmentReconstructor::commitment(d, s))
            .collect();

        Self {
            tree: MerkleTree::build(leaves).expect("power-of-two leaf count"),
            digests,
            signatures,
        }
    }

    pub fn root(&self) -> Hash {
        self.tree.root()
    }

    pub fn request(&self, principal: Address, index: u64) -> AuthorizationRequest<OneTimeSignature> {
        AuthorizationRequest {
            principal,
            message_digest: self.digests[index as usize],
            key_index: index,
            leaf_hash: self.tree.leaf(index).expect("index in range"),
            proof: self.tree.proof(index).expect("index in range"),
            signature: self.signatures[index as usize].clone(),
        }
    }
}
