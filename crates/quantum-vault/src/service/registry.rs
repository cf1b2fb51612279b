//! # Key Registry Operations
//!
//! register / rotate / revoke and the read views, on top of the pure
//! transitions in `domain::registry`.

use super::*;
use crate::domain::entities::{KeySetStatus, QuantumKeySet, VaultEvent};
use crate::domain::registry;
use crate::ports::outbound::BatchOperation;
use shared_types::{Address, Hash, KeyIndex};
use tracing::debug;

impl<KV, TS, EV, SR> QuantumVaultService<KV, TS, EV, SR>
where
    KV: KeyValueStore,
    TS: TimeSource,
    EV: VaultEventSink,
    SR: SignatureReconstructor,
{
    pub(crate) fn register_key_set(
        &self,
        principal: Address,
        merkle_root: Hash,
        total_keys: u64,
    ) -> Result<(), VaultError> {
        let _guard = self.locks.lock(&principal);

        let existing = codec::load_key_set(&*self.store.read(), &principal)?;
        let key_set = registry::register(
            existing.as_ref(),
            &principal,
            merkle_root,
            total_keys,
            self.time_source.now(),
        )?;
        self.commit_key_set(&principal, &key_set)?;

        info!(
            "[vault] 🔐 Registered key set for {} ({} keys, generation {})",
            short_hex(&principal),
            total_keys,
            key_set.generation
        );
        self.events.publish(VaultEvent::KeySetRegistered {
            principal,
            merkle_root,
            total_keys,
            generation: key_set.generation,
        });
        Ok(())
    }

    pub(crate) fn rotate_key_set(
        &self,
        principal: Address,
        merkle_root: Hash,
        total_keys: u64,
    ) -> Result<(), VaultError> {
        let _guard = self.locks.lock(&principal);

        let existing = codec::load_key_set(&*self.store.read(), &principal)?;
        let key_set = registry::rotate(
            existing.as_ref(),
            &principal,
            merkle_root,
            total_keys,
            self.time_source.now(),
        )?;
        self.commit_key_set(&principal, &key_set)?;

        info!(
            "[vault] 🔄 Rotated key set for {} ({} keys, generation {})",
            short_hex(&principal),
            total_keys,
            key_set.generation
        );
        self.events.publish(VaultEvent::KeySetRotated {
            principal,
            merkle_root,
            total_keys,
            generation: key_set.generation,
        });
        Ok(())
    }

    pub(crate) fn revoke_key_set(&self, principal: Address) -> Result<(), VaultError> {
        let _guard = self.locks.lock(&principal);

        let existing = codec::load_key_set(&*self.store.read(), &principal)?;
        let key_set = registry::revoke(existing.as_ref(), &principal, self.time_source.now())?;
        self.commit_key_set(&principal, &key_set)?;

        info!(
            "[vault] 🔓 Revoked key set for {} (generation {})",
            short_hex(&principal),
            key_set.generation
        );
        self.events.publish(VaultEvent::KeySetRevoked {
            principal,
            generation: key_set.generation,
        });
        Ok(())
    }

    fn commit_key_set(&self, principal: &Address, key_set: &QuantumKeySet) -> Result<(), VaultError> {
        let encoded = codec::encode_key_set(key_set)?;
        self.store
            .write()
            .atomic_batch_write(vec![BatchOperation::put(
                KeyPrefix::key_set_key(principal),
                encoded,
            )])?;
        Ok(())
    }

    // =========================================================================
    // Read views
    // =========================================================================

    pub(crate) fn read_key_set(
        &self,
        principal: &Address,
    ) -> Result<Option<QuantumKeySet>, VaultError> {
        let key_set = codec::load_key_set(&*self.store.read(), principal)?;
        debug!(
            "[vault] Key set lookup for {}: {:?}",
            short_hex(principal),
            key_set.as_ref().map(QuantumKeySet::status)
        );
        Ok(key_set)
    }

    pub(crate) fn read_status(&self, principal: &Address) -> Result<KeySetStatus, VaultError> {
        Ok(self
            .read_key_set(principal)?
            .map_or(KeySetStatus::Unregistered, |ks| ks.status()))
    }

    pub(crate) fn read_is_used(
        &self,
        principal: &Address,
        key_index: KeyIndex,
    ) -> Result<bool, VaultError> {
        codec::is_used(&*self.store.read(), principal, key_index)
    }

    pub(crate) fn read_used_indices(&self, principal: &Address) -> Result<Vec<KeyIndex>, VaultError> {
        codec::load_used_indices(&*self.store.read(), principal)
    }
}
