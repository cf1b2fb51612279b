//! Record encoding and typed store reads.

use shared_types::{Address, KeyIndex, U256};

use crate::domain::entities::QuantumKeySet;
use crate::domain::errors::VaultError;
use crate::domain::value_objects::KeyPrefix;
use crate::ports::outbound::KeyValueStore;

pub(crate) fn encode_key_set(key_set: &QuantumKeySet) -> Result<Vec<u8>, VaultError> {
    Ok(bincode::serialize(key_set)?)
}

pub(crate) fn encode_threshold(threshold: &U256) -> Result<Vec<u8>, VaultError> {
    Ok(bincode::serialize(threshold)?)
}

pub(crate) fn load_key_set<KV: KeyValueStore + ?Sized>(
    store: &KV,
    principal: &Address,
) -> Result<Option<QuantumKeySet>, VaultError> {
    match store.get(&KeyPrefix::key_set_key(principal))? {
        Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
        None => Ok(None),
    }
}

pub(crate) fn is_used<KV: KeyValueStore + ?Sized>(
    store: &KV,
    principal: &Address,
    key_index: KeyIndex,
) -> Result<bool, VaultError> {
    Ok(store.exists(&KeyPrefix::used_key_key(principal, key_index))?)
}

pub(crate) fn load_used_indices<KV: KeyValueStore + ?Sized>(
    store: &KV,
    principal: &Address,
) -> Result<Vec<KeyIndex>, VaultError> {
    let prefix = KeyPrefix::used_key_prefix(principal);
    store
        .prefix_scan(&prefix)?
        .into_iter()
        .map(|(key, _)| {
            let index_bytes: [u8; 8] = key
                .get(prefix.len()..)
                .and_then(|s| s.try_into().ok())
                .ok_or_else(|| {
                    VaultError::Serialization(format!(
                        "malformed ledger key of {} bytes",
                        key.len()
                    ))
                })?;
            Ok(KeyIndex::from_be_bytes(index_bytes))
        })
        .collect()
}

pub(crate) fn load_threshold<KV: KeyValueStore + ?Sized>(store: &KV) -> Result<U256, VaultError> {
    match store.get(KeyPrefix::THRESHOLD)? {
        Some(bytes) => Ok(bincode::deserialize(&bytes)?),
        None => Ok(U256::zero()),
    }
}
