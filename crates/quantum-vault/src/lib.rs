//! # Quantum Vault
//!
//! One-time-signature authorization for accounts that want protection
//! against a future quantum adversary.
//!
//! A principal commits to a Merkle root over `2^k` single-use hash-based
//! public keys. Each authorization reveals one key: the caller presents the
//! key's leaf, its inclusion proof and the revealed signature, and the vault
//! records the key index as consumed, permanently.
//!
//! ## Architecture
//!
//! ```text
//! register(root, n) ──→ KeyRegistry ──→ [ks:principal]
//!
//! verify_and_consume(request)
//!   │
//!   ├─ KeyRegistry        active? exhausted?
//!   ├─ UsedKeyLedger      index already used?          [ul:principal:index]
//!   ├─ ProofVerifier      leaf ∈ root at index?
//!   ├─ SignatureReconstructor   reconstruct(digest, sig) == leaf?
//!   └─ commit (one batch) ledger entry + used_keys + 1
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Power-of-two key sets | `total_keys` is a non-zero power of two |
//! | Bounded usage | `used_keys <= total_keys` |
//! | Permanent ledger | a consumed `(principal, index)` is never reset, not even by `rotate` |
//! | Indivisible consume | "already used" and "mark used" are one unit per principal |
//! | Revoke cooldown | `revoke` only at or after `registered_at + 7 days` |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure domain logic (entities, Merkle proofs, signature schemes, transitions)
//! - `ports/` - Port traits (inbound API, outbound SPI)
//! - `adapters/` - Storage, clock and event sink implementations
//! - `service/` - Application service implementing the API
//!
//! ## Signature Scheme
//!
//! The default [`ChunkCommitmentReconstructor`] is a simplified scheme that
//! does not check revealed values against complementary public-key halves.
//! [`LamportReconstructor`] performs the full dual-half check and plugs into
//! the same service through [`VaultDependencies::reconstructor`].
//!
//! ## Usage
//!
//! ```ignore
//! use quantum_vault::{QuantumAuthApi, QuantumVaultService, VaultConfig};
//!
//! let vault = QuantumVaultService::new_in_memory(VaultConfig::new().with_owner(owner))?;
//! vault.register(principal, tree.root(), 8)?;
//!
//! let request = AuthorizationRequest { principal, message_digest, key_index: 3, leaf_hash, proof, signature };
//! assert!(vault.verify_and_consume(&request)?);
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use adapters::{
    BroadcastEventSink, FileBackedKVStore, InMemoryKVStore, LoggingEventSink, ManualTimeSource,
    SystemTimeSource,
};
pub use domain::entities::{
    AuthorizationRequest, KeySetStatus, OneTimeSignature, QuantumKeySet, VaultEvent,
};
pub use domain::errors::{ErrorCategory, KVStoreError, VaultError};
pub use domain::merkle::{hash_pair, keccak256, MerkleBuildError, MerkleTree, ProofVerifier};
pub use domain::signature::{
    ChunkCommitmentReconstructor, LamportReconstructor, LamportSignature, SignatureReconstructor,
};
pub use domain::value_objects::{KeyPrefix, VaultConfig, CHUNKS, LAMPORT_BITS, REVOKE_COOLDOWN_SECS};
pub use ports::inbound::{ProtectionConfigApi, QuantumAuthApi};
pub use ports::outbound::{
    BatchOperation, KeyValueStore, NoopEventSink, ScanResult, TimeSource, VaultEventSink,
};
pub use service::{QuantumVaultService, VaultDependencies};
