//! # Signature Reconstruction
//!
//! Derives a public-key commitment (a Merkle leaf) from a revealed one-time
//! signature and the message digest it signs. The gate compares the result
//! with the caller's claimed leaf.
//!
//! ## Schemes
//!
//! | Reconstructor | Signature | Checks |
//! |---------------|-----------|--------|
//! | [`ChunkCommitmentReconstructor`] (default) | [`OneTimeSignature`] | revealed chunks hash into a structure bound to digest and selectors |
//! | [`LamportReconstructor`] | [`LamportSignature`] | each revealed preimage fills the digest-bit-selected public-key half |
//!
//! ## Known gap in the default scheme
//!
//! `ChunkCommitmentReconstructor` does NOT check each revealed value against
//! two complementary public-key halves. A leaf built this way is bound to a
//! single digest, and nothing ties the revealed chunks to secret key
//! material. Deployments that need unforgeability must plug in
//! [`LamportReconstructor`] through the [`SignatureReconstructor`] seam.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use shared_types::Hash;

use super::entities::OneTimeSignature;
use super::merkle::keccak256;
use super::value_objects::{CHUNKS, LAMPORT_BITS};

/// Bytes per per-chunk record: hashed chunk, digest byte, selector.
const CHUNK_RECORD_LEN: usize = 32 + 1 + 1;

/// Pluggable signature check.
///
/// Returns the reconstructed leaf, or `None` when the signature is
/// structurally malformed. Implementations must be pure and must not panic
/// on any input.
pub trait SignatureReconstructor: Send + Sync {
    /// The revealed signature type this scheme consumes.
    type Signature: Send + Sync;

    /// Reconstruct the public-key commitment for `digest`.
    fn reconstruct(&self, digest: &Hash, signature: &Self::Signature) -> Option<Hash>;
}

/// Simplified chunk-commitment reconstruction.
///
/// For each chunk `c`: `keccak256(chunk[c]) || digest[c] || selector[c]`.
/// The leaf is `keccak256` over all concatenated records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkCommitmentReconstructor;

impl ChunkCommitmentReconstructor {
    /// Compute the commitment. Infallible: every input has the fixed shape.
    pub fn commitment(digest: &Hash, signature: &OneTimeSignature) -> Hash {
        let mut hasher = Keccak256::new();
        for c in 0..CHUNKS {
            let mut record = [0u8; CHUNK_RECORD_LEN];
            record[..32].copy_from_slice(&keccak256(&signature.chunks[c]));
            record[32] = digest[c];
            record[33] = signature.selectors[c];
            hasher.update(record);
        }
        hasher.finalize().into()
    }
}

impl SignatureReconstructor for ChunkCommitmentReconstructor {
    type Signature = OneTimeSignature;

    fn reconstruct(&self, digest: &Hash, signature: &OneTimeSignature) -> Option<Hash> {
        Some(Self::commitment(digest, signature))
    }
}

/// A 256-bit Lamport one-time signature.
///
/// For digest bit `i`, `revealed[i]` is the secret preimage of the public-key
/// half selected by the bit, `complements[i]` is the public hash of the
/// other half.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LamportSignature {
    pub revealed: Vec<Hash>,
    pub complements: Vec<Hash>,
}

/// Dual-half Lamport reconstruction.
///
/// Leaf = `keccak256(pk0[0] || pk1[0] || ... || pk0[255] || pk1[255])` where
/// `pk{b}[i] = keccak256(revealed[i])` for the digest bit `b` and the
/// complement fills the opposite half.
#[derive(Debug, Clone, Copy, Default)]
pub struct LamportReconstructor;

impl LamportReconstructor {
    /// Bit `i` of `digest`, most significant bit of byte 0 first.
    pub fn digest_bit(digest: &Hash, i: usize) -> u8 {
        (digest[i / 8] >> (7 - (i % 8))) & 1
    }

    /// Leaf committing to a full Lamport public key given as `(pk0, pk1)` pairs.
    pub fn public_key_commitment(public_key: &[(Hash, Hash)]) -> Hash {
        let mut hasher = Keccak256::new();
        for (pk0, pk1) in public_key {
            hasher.update(pk0);
            hasher.update(pk1);
        }
        hasher.finalize().into()
    }
}

impl SignatureReconstructor for LamportReconstructor {
    type Signature = LamportSignature;

    fn reconstruct(&self, digest: &Hash, signature: &LamportSignature) -> Option<Hash> {
        if signature.revealed.len() != LAMPORT_BITS || signature.complements.len() != LAMPORT_BITS
        {
            return None;
        }

        let mut hasher = Keccak256::new();
        for (i, (revealed, complement)) in signature
            .revealed
            .iter()
            .zip(signature.complements.iter())
            .enumerate()
        {
            let revealed_pk = keccak256(revealed);
            if Self::digest_bit(digest, i) == 0 {
                hasher.update(revealed_pk);
                hasher.update(complement);
            } else {
                hasher.update(complement);
                hasher.update(revealed_pk);
            }
        }
        Some(hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_signature(seed: u8) -> OneTimeSignature {
        let mut chunks = [[0u8; 32]; CHUNKS];
        let mut selectors = [0u8; CHUNKS];
        for c in 0..CHUNKS {
            chunks[c] = [seed.wrapping_add(c as u8); 32];
            selectors[c] = (c as u8) % 2;
        }
        OneTimeSignature::new(chunks, selectors)
    }

    /// Deterministic Lamport key pair: `sk[i][b] = keccak(seed || i || b)`.
    fn lamport_keypair(seed: u8) -> (Vec<[Hash; 2]>, Vec<(Hash, Hash)>) {
        let mut secret = Vec::with_capacity(LAMPORT_BITS);
        let mut public = Vec::with_capacity(LAMPORT_BITS);
        for i in 0..LAMPORT_BITS {
            let sk0 = keccak256(&[seed, (i >> 8) as u8, i as u8, 0]);
            let sk1 = keccak256(&[seed, (i >> 8) as u8, i as u8, 1]);
            public.push((keccak256(&sk0), keccak256(&sk1)));
            secret.push([sk0, sk1]);
        }
        (secret, public)
    }

    fn lamport_sign(
        digest: &Hash,
        secret: &[[Hash; 2]],
        public: &[(Hash, Hash)],
    ) -> LamportSignature {
        let mut revealed = Vec::with_capacity(LAMPORT_BITS);
        let mut complements = Vec::with_capacity(LAMPORT_BITS);
        for i in 0..LAMPORT_BITS {
            let bit = LamportReconstructor::digest_bit(digest, i) as usize;
            revealed.push(secret[i][bit]);
            complements.push(if bit == 0 { public[i].1 } else { public[i].0 });
        }
        LamportSignature {
            revealed,
            complements,
        }
    }

    #[test]
    fn test_chunk_commitment_is_deterministic() {
        let digest = [0x42; 32];
        let sig = sample_signature(1);
        let a = ChunkCommitmentReconstructor.reconstruct(&digest, &sig);
        let b = ChunkCommitmentReconstructor.reconstruct(&digest, &sig);
        assert_eq!(a, b);
    }

    #[test]
    fn test_chunk_commitment_binds_digest() {
        let sig = sample_signature(1);
        let mut other = [0x42; 32];
        other[31] ^= 1;
        assert_ne!(
            ChunkCommitmentReconstructor::commitment(&[0x42; 32], &sig),
            ChunkCommitmentReconstructor::commitment(&other, &sig)
        );
    }

    #[test]
    fn test_chunk_commitment_binds_selectors_and_chunks() {
        let digest = [0x42; 32];
        let sig = sample_signature(1);
        let base = ChunkCommitmentReconstructor::commitment(&digest, &sig);

        let mut flipped_selector = sig.clone();
        flipped_selector.selectors[5] ^= 1;
        assert_ne!(
            base,
            ChunkCommitmentReconstructor::commitment(&digest, &flipped_selector)
        );

        let mut flipped_chunk = sig;
        flipped_chunk.chunks[17][0] ^= 1;
        assert_ne!(
            base,
            ChunkCommitmentReconstructor::commitment(&digest, &flipped_chunk)
        );
    }

    #[test]
    fn test_chunk_commitment_record_layout() {
        let digest = [0x07; 32];
        let sig = sample_signature(3);

        let mut preimage = Vec::with_capacity(CHUNKS * CHUNK_RECORD_LEN);
        for c in 0..CHUNKS {
            preimage.extend_from_slice(&keccak256(&sig.chunks[c]));
            preimage.push(digest[c]);
            preimage.push(sig.selectors[c]);
        }
        assert_eq!(
            ChunkCommitmentReconstructor::commitment(&digest, &sig),
            keccak256(&preimage)
        );
    }

    #[test]
    fn test_lamport_valid_signature_reconstructs_public_key() {
        let (secret, public) = lamport_keypair(9);
        let digest = keccak256(b"transfer 100 to 0xbeef");
        let sig = lamport_sign(&digest, &secret, &public);

        assert_eq!(
            LamportReconstructor.reconstruct(&digest, &sig),
            Some(LamportReconstructor::public_key_commitment(&public))
        );
    }

    #[test]
    fn test_lamport_signature_does_not_transfer_to_other_digest() {
        let (secret, public) = lamport_keypair(9);
        let digest = keccak256(b"transfer 100 to 0xbeef");
        let sig = lamport_sign(&digest, &secret, &public);

        let mut other = digest;
        other[0] ^= 0x80;
        assert_ne!(
            LamportReconstructor.reconstruct(&other, &sig),
            Some(LamportReconstructor::public_key_commitment(&public))
        );
    }

    #[test]
    fn test_lamport_wrong_preimage_fails() {
        let (secret, public) = lamport_keypair(9);
        let digest = [0x5A; 32];
        let mut sig = lamport_sign(&digest, &secret, &public);
        sig.revealed[100] = [0u8; 32];

        assert_ne!(
            LamportReconstructor.reconstruct(&digest, &sig),
            Some(LamportReconstructor::public_key_commitment(&public))
        );
    }

    #[test]
    fn test_lamport_malformed_length_is_none() {
        let sig = LamportSignature {
            revealed: vec![[0u8; 32]; 10],
            complements: vec![[0u8; 32]; LAMPORT_BITS],
        };
        assert_eq!(LamportReconstructor.reconstruct(&[0u8; 32], &sig), None);
    }

    #[test]
    fn test_digest_bit_order() {
        let mut digest = [0u8; 32];
        digest[0] = 0b1000_0000;
        digest[1] = 0b0000_0001;
        assert_eq!(LamportReconstructor::digest_bit(&digest, 0), 1);
        assert_eq!(LamportReconstructor::digest_bit(&digest, 1), 0);
        assert_eq!(LamportReconstructor::digest_bit(&digest, 15), 1);
    }
}
