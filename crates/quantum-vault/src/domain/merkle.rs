//! # Merkle Commitments
//!
//! Inclusion proofs binding a one-time public-key commitment (leaf) to a
//! principal's registered root.
//!
//! ALGORITHM: binary hash tree, each parent is `keccak256(left || right)`.
//! The side a computed node takes at proof level `i` is bit `i` of the key
//! index (LSB first): `0` means the computed node is the left operand.

use sha3::{Digest, Keccak256};
use shared_types::{Hash, KeyIndex};

use super::value_objects::MAX_PROOF_DEPTH;

/// Keccak-256 of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Hash two concatenated nodes: `keccak256(left || right)`.
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Verifies Merkle inclusion of a leaf against a registered root.
pub struct ProofVerifier;

impl ProofVerifier {
    /// Recompute the root from `leaf`, `index` and `proof` and compare.
    ///
    /// A proof of the wrong length simply fails to reconstruct the root.
    pub fn verify(leaf: &Hash, index: KeyIndex, proof: &[Hash], root: &Hash) -> bool {
        Self::compute_root(leaf, index, proof) == *root
    }

    /// Verify inclusion for a key set of `total_keys` leaves.
    ///
    /// On top of [`verify`](Self::verify) this requires
    /// `proof.len() == log2(total_keys)` and `index < total_keys`. Without
    /// the range check, index `i + total_keys` would reuse the proof of
    /// index `i` under a different ledger entry.
    pub fn verify_for_key_set(
        leaf: &Hash,
        index: KeyIndex,
        proof: &[Hash],
        root: &Hash,
        total_keys: u64,
    ) -> bool {
        if total_keys == 0 || !total_keys.is_power_of_two() {
            return false;
        }
        if index >= total_keys {
            return false;
        }
        if proof.len() != total_keys.trailing_zeros() as usize {
            return false;
        }
        Self::verify(leaf, index, proof, root)
    }

    /// Fold the proof path into a root candidate.
    pub fn compute_root(leaf: &Hash, index: KeyIndex, proof: &[Hash]) -> Hash {
        let mut computed = *leaf;
        for (level, sibling) in proof.iter().enumerate() {
            // Bits beyond the index width are zero: computed stays on the left.
            let bit = if level < 64 { (index >> level) & 1 } else { 0 };
            computed = if bit == 0 {
                hash_pair(&computed, sibling)
            } else {
                hash_pair(sibling, &computed)
            };
        }
        computed
    }
}

/// Errors from building a commitment tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MerkleBuildError {
    /// Leaf count is zero or not a power of two.
    InvalidLeafCount { count: usize },
    /// Tree would be deeper than any key set allows.
    TooDeep { depth: usize },
    /// Requested leaf index is outside the tree.
    IndexOutOfRange { index: KeyIndex, leaf_count: usize },
}

impl std::fmt::Display for MerkleBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLeafCount { count } => {
                write!(f, "Leaf count {} is not a non-zero power of two", count)
            }
            Self::TooDeep { depth } => {
                write!(f, "Tree depth {} exceeds {}", depth, MAX_PROOF_DEPTH)
            }
            Self::IndexOutOfRange { index, leaf_count } => {
                write!(f, "Leaf index {} out of range (leaves: {})", index, leaf_count)
            }
        }
    }
}

impl std::error::Error for MerkleBuildError {}

/// A complete binary tree over one generation of public-key commitments.
///
/// Used off the authorization path: by tooling that prepares a key set and
/// by tests. Stored in array form `[root, level1..., leaves...]`; the parent
/// of node `i > 0` is `(i - 1) / 2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    nodes: Vec<Hash>,
    leaf_count: usize,
}

impl MerkleTree {
    /// Build a tree from exactly `2^k` leaves.
    pub fn build(leaves: Vec<Hash>) -> Result<Self, MerkleBuildError> {
        let leaf_count = leaves.len();
        if leaf_count == 0 || !leaf_count.is_power_of_two() {
            return Err(MerkleBuildError::InvalidLeafCount { count: leaf_count });
        }
        let depth = leaf_count.trailing_zeros() as usize;
        if depth > MAX_PROOF_DEPTH {
            return Err(MerkleBuildError::TooDeep { depth });
        }

        let leaf_start = leaf_count - 1;
        let mut nodes = vec![[0u8; 32]; 2 * leaf_count - 1];
        nodes[leaf_start..].copy_from_slice(&leaves);

        for i in (0..leaf_start).rev() {
            nodes[i] = hash_pair(&nodes[2 * i + 1], &nodes[2 * i + 2]);
        }

        Ok(Self { nodes, leaf_count })
    }

    /// The committed root.
    pub fn root(&self) -> Hash {
        self.nodes[0]
    }

    /// Number of leaves (the generation's `total_keys`).
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// The leaf at `index`, if in range.
    pub fn leaf(&self, index: KeyIndex) -> Option<Hash> {
        let index = usize::try_from(index).ok()?;
        if index >= self.leaf_count {
            return None;
        }
        self.nodes.get(self.leaf_count - 1 + index).copied()
    }

    /// Sibling path for the leaf at `index`, ordered leaf to root.
    pub fn proof(&self, index: KeyIndex) -> Result<Vec<Hash>, MerkleBuildError> {
        let out_of_range = MerkleBuildError::IndexOutOfRange {
            index,
            leaf_count: self.leaf_count,
        };
        let position = usize::try_from(index).map_err(|_| out_of_range.clone())?;
        if position >= self.leaf_count {
            return Err(out_of_range);
        }

        let mut current = self.leaf_count - 1 + position;
        let mut path = Vec::with_capacity(self.leaf_count.trailing_zeros() as usize);
        while current > 0 {
            // Odd array index = left child, sibling to the right.
            let sibling = if current % 2 == 1 {
                current + 1
            } else {
                current - 1
            };
            path.push(self.nodes[sibling]);
            current = (current - 1) / 2;
        }
        Ok(path)
    }
}
