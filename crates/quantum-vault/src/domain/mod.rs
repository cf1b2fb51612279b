//! # Domain Layer
//!
//! Pure domain logic for the quantum authorization vault.
//! No storage, clock or locking: every function here is deterministic.
//!
//! ## Modules
//!
//! - `entities` - Key set, one-time signature, requests, events
//! - `value_objects` - Constants, configuration, storage key layout
//! - `errors` - Error taxonomy
//! - `merkle` - Inclusion proofs and the commitment tree builder
//! - `signature` - Pluggable signature reconstruction
//! - `registry` - register / rotate / revoke / consume transitions
//! - `authorization` - Gate decision logic
//! - `protection` - Owner guard for administrative settings

pub mod authorization;
pub mod entities;
pub mod errors;
pub mod merkle;
pub mod protection;
pub mod registry;
pub mod signature;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use merkle::{hash_pair, keccak256, MerkleBuildError, MerkleTree, ProofVerifier};
pub use signature::{
    ChunkCommitmentReconstructor, LamportReconstructor, LamportSignature, SignatureReconstructor,
};
pub use value_objects::*;
