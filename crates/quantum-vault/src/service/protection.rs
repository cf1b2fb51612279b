//! # Protection Configuration
//!
//! Owner-gated settings: protected targets and the value threshold.

use super::*;
use crate::domain::entities::VaultEvent;
use crate::domain::protection::{decode_flag, encode_flag, ensure_owner};
use crate::domain::registry::validate_principal;
use shared_types::{Address, U256};
use tracing::warn;

impl<KV, TS, EV, SR> QuantumVaultService<KV, TS, EV, SR>
where
    KV: KeyValueStore,
    TS: TimeSource,
    EV: VaultEventSink,
    SR: SignatureReconstructor,
{
    pub(crate) fn write_protected_target(
        &self,
        caller: Address,
        target: Address,
        protected: bool,
    ) -> Result<(), VaultError> {
        self.guard_owner(&caller)?;
        validate_principal(&target)?;

        self.store
            .write()
            .put(&KeyPrefix::protected_target_key(&target), &encode_flag(protected))?;

        info!(
            "[vault] 🛡️ Target {} protected={}",
            short_hex(&target),
            protected
        );
        self.events
            .publish(VaultEvent::ProtectedTargetUpdated { target, protected });
        Ok(())
    }

    pub(crate) fn write_threshold(&self, caller: Address, threshold: U256) -> Result<(), VaultError> {
        self.guard_owner(&caller)?;

        let encoded = codec::encode_threshold(&threshold)?;
        self.store.write().put(KeyPrefix::THRESHOLD, &encoded)?;

        info!("[vault] 🛡️ Threshold set to {}", threshold);
        self.events.publish(VaultEvent::ThresholdUpdated { threshold });
        Ok(())
    }

    pub(crate) fn read_protected_target(&self, target: &Address) -> Result<bool, VaultError> {
        let flag = self
            .store
            .read()
            .get(&KeyPrefix::protected_target_key(target))?;
        decode_flag(flag.as_deref())
    }

    pub(crate) fn read_threshold(&self) -> Result<U256, VaultError> {
        codec::load_threshold(&*self.store.read())
    }

    fn guard_owner(&self, caller: &Address) -> Result<(), VaultError> {
        ensure_owner(caller, &self.config.owner).inspect_err(|_| {
            warn!(
                "[vault] 🚫 Unauthorized admin call from {}",
                short_hex(caller)
            )
        })
    }
}
