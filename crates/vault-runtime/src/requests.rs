//! # Authorization Request Files
//!
//! JSON encoding of `AuthorizationRequest<OneTimeSignature>` for the
//! `verify` and `consume` commands. Every hash and address is a hex string
//! (optional `0x` prefix).
//!
//! ```json
//! {
//!   "principal": "0x…20 bytes…",
//!   "message_digest": "0x…32 bytes…",
//!   "key_index": 3,
//!   "leaf_hash": "0x…32 bytes…",
//!   "proof": ["0x…", "0x…", "0x…"],
//!   "signature": { "chunks": ["0x…", …32 entries…], "selectors": [0, 1, …32 entries…] }
//! }
//! ```

use std::path::Path;

use quantum_vault::{AuthorizationRequest, OneTimeSignature, CHUNKS};
use serde::{Deserialize, Serialize};
use shared_types::{address_from_hex, hash_from_hex, to_hex, Hash, HexDecodeError, KeyIndex};
use thiserror::Error;

/// Errors decoding a request file.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The file could not be read.
    #[error("Cannot read request file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid request JSON.
    #[error("Malformed request JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A hex field did not decode.
    #[error("Field {field}: {source}")]
    Hex {
        field: String,
        #[source]
        source: HexDecodeError,
    },

    /// The signature does not carry one chunk per digest byte.
    #[error("Signature has {actual} chunks, expected 32")]
    ChunkCount { actual: usize },

    /// The signature does not carry one selector per chunk.
    #[error("Signature has {actual} selectors, expected 32")]
    SelectorCount { actual: usize },
}

/// Signature as it appears in a request file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureJson {
    pub chunks: Vec<String>,
    pub selectors: Vec<u8>,
}

/// Request as it appears in a request file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestJson {
    pub principal: String,
    pub message_digest: String,
    pub key_index: KeyIndex,
    pub leaf_hash: String,
    pub proof: Vec<String>,
    pub signature: SignatureJson,
}

impl RequestJson {
    /// Read and parse a request file.
    pub fn load(path: &Path) -> Result<Self, RequestError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Decode into the vault's request type.
    pub fn decode(&self) -> Result<AuthorizationRequest<OneTimeSignature>, RequestError> {
        let principal = address_from_hex(&self.principal).map_err(hex_field("principal"))?;
        let message_digest =
            hash_from_hex(&self.message_digest).map_err(hex_field("message_digest"))?;
        let leaf_hash = hash_from_hex(&self.leaf_hash).map_err(hex_field("leaf_hash"))?;

        let proof = self
            .proof
            .iter()
            .enumerate()
            .map(|(i, h)| hash_from_hex(h).map_err(hex_field(&format!("proof[{i}]"))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AuthorizationRequest {
            principal,
            message_digest,
            key_index: self.key_index,
            leaf_hash,
            proof,
            signature: self.signature.decode()?,
        })
    }

    /// Encode a request for writing to a file.
    pub fn encode(request: &AuthorizationRequest<OneTimeSignature>) -> Self {
        Self {
            principal: to_hex(&request.principal),
            message_digest: to_hex(&request.message_digest),
            key_index: request.key_index,
            leaf_hash: to_hex(&request.leaf_hash),
            proof: request.proof.iter().map(|h| to_hex(h)).collect(),
            signature: SignatureJson {
                chunks: request.signature.chunks.iter().map(|c| to_hex(c)).collect(),
                selectors: request.signature.selectors.to_vec(),
            },
        }
    }
}

impl SignatureJson {
    fn decode(&self) -> Result<OneTimeSignature, RequestError> {
        let chunks: [Hash; CHUNKS] = self
            .chunks
            .iter()
            .enumerate()
            .map(|(i, c)| {
                hash_from_hex(c).map_err(hex_field(&format!("signature.chunks[{i}]")))
            })
            .collect::<Result<Vec<_>, _>>()?
            .try_into()
            .map_err(|v: Vec<Hash>| RequestError::ChunkCount { actual: v.len() })?;

        let selectors: [u8; CHUNKS] = self.selectors.as_slice().try_into().map_err(|_| {
            RequestError::SelectorCount {
                actual: self.selectors.len(),
            }
        })?;

        Ok(OneTimeSignature::new(chunks, selectors))
    }
}

fn hex_field(field: &str) -> impl FnOnce(HexDecodeError) -> RequestError + '_ {
    move |source| RequestError::Hex {
        field: field.to_string(),
        source,
    }
}
