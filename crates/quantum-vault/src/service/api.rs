//! # API Implementations
//!
//! `QuantumAuthApi` and `ProtectionConfigApi` for the service.

use super::*;
use crate::domain::entities::{AuthorizationRequest, KeySetStatus, QuantumKeySet};
use crate::ports::inbound::{ProtectionConfigApi, QuantumAuthApi};
use shared_types::{Address, Hash, KeyIndex, U256};

impl<KV, TS, EV, SR> QuantumAuthApi for QuantumVaultService<KV, TS, EV, SR>
where
    KV: KeyValueStore,
    TS: TimeSource,
    EV: VaultEventSink,
    SR: SignatureReconstructor,
{
    type Signature = SR::Signature;

    fn register(
        &self,
        principal: Address,
        merkle_root: Hash,
        total_keys: u64,
    ) -> Result<(), VaultError> {
        self.register_key_set(principal, merkle_root, total_keys)
    }

    fn rotate(
        &self,
        principal: Address,
        merkle_root: Hash,
        total_keys: u64,
    ) -> Result<(), VaultError> {
        self.rotate_key_set(principal, merkle_root, total_keys)
    }

    fn revoke(&self, principal: Address) -> Result<(), VaultError> {
        self.revoke_key_set(principal)
    }

    fn verify(&self, request: &AuthorizationRequest<Self::Signature>) -> Result<bool, VaultError> {
        self.authorize(request, false)
    }

    fn verify_and_consume(
        &self,
        request: &AuthorizationRequest<Self::Signature>,
    ) -> Result<bool, VaultError> {
        self.authorize(request, true)
    }

    fn has_protection(&self, principal: &Address) -> Result<bool, VaultError> {
        Ok(self.read_key_set(principal)?.is_some_and(|ks| ks.active))
    }

    fn remaining_keys(&self, principal: &Address) -> Result<u64, VaultError> {
        Ok(self
            .read_key_set(principal)?
            .map_or(0, |ks| ks.remaining_keys()))
    }

    fn get_key_set(&self, principal: &Address) -> Result<Option<QuantumKeySet>, VaultError> {
        self.read_key_set(principal)
    }

    fn key_status(&self, principal: &Address) -> Result<KeySetStatus, VaultError> {
        self.read_status(principal)
    }

    fn is_key_used(&self, principal: &Address, key_index: KeyIndex) -> Result<bool, VaultError> {
        self.read_is_used(principal, key_index)
    }

    fn used_key_indices(&self, principal: &Address) -> Result<Vec<KeyIndex>, VaultError> {
        self.read_used_indices(principal)
    }
}

impl<KV, TS, EV, SR> ProtectionConfigApi for QuantumVaultService<KV, TS, EV, SR>
where
    KV: KeyValueStore,
    TS: TimeSource,
    EV: VaultEventSink,
    SR: SignatureReconstructor,
{
    fn set_protected_target(
        &self,
        caller: Address,
        target: Address,
        protected: bool,
    ) -> Result<(), VaultError> {
        self.write_protected_target(caller, target, protected)
    }

    fn set_threshold(&self, caller: Address, threshold: U256) -> Result<(), VaultError> {
        self.write_threshold(caller, threshold)
    }

    fn is_protected_target(&self, target: &Address) -> Result<bool, VaultError> {
        self.read_protected_target(target)
    }

    fn threshold(&self) -> Result<U256, VaultError> {
        self.read_threshold()
    }

    fn owner(&self) -> Address {
        self.config.owner
    }
}
