//! # Authorization Gate
//!
//! `verify` and `verify_and_consume`.
//!
//! ## Flow
//!
//! ```text
//! [principal lock, consume only]
//!   → snapshot (key set + ledger entry) under one store read guard
//!   → state checks → proof → signature          (no store guard)
//!   → batch { ledger entry = [1], key set.used_keys + 1 }   (write guard)
//!   → events
//! ```

use super::*;
use crate::domain::authorization::{check_crypto, check_state};
use crate::domain::entities::{AuthorizationRequest, QuantumKeySet, VaultEvent};
use crate::domain::registry;
use crate::domain::value_objects::USED_MARKER;
use crate::ports::outbound::BatchOperation;
use shared_types::Address;
use tracing::{debug, warn};

impl<KV, TS, EV, SR> QuantumVaultService<KV, TS, EV, SR>
where
    KV: KeyValueStore,
    TS: TimeSource,
    EV: VaultEventSink,
    SR: SignatureReconstructor,
{
    /// Run every check; when `consume` is set, commit the key on success.
    pub(crate) fn authorize(
        &self,
        request: &AuthorizationRequest<SR::Signature>,
        consume: bool,
    ) -> Result<bool, VaultError> {
        let principal = request.principal;

        // Held until the commit: the replay check and the ledger write are
        // one unit for this principal.
        let _guard = consume.then(|| self.locks.lock(&principal));

        let (key_set, already_used) = {
            let store = self.store.read();
            let key_set = codec::load_key_set(&*store, &principal)?;
            let already_used = codec::is_used(&*store, &principal, request.key_index)?;
            (key_set, already_used)
        };

        let key_set = check_state(
            &principal,
            key_set.as_ref(),
            already_used,
            request.key_index,
        )
        .map_err(|e| self.log_rejection(request, e))?;

        check_crypto(key_set, request, &self.reconstructor)
            .map_err(|e| self.log_rejection(request, e))?;

        if !consume {
            debug!(
                "[vault] Verified key {} for {} (read-only)",
                request.key_index,
                short_hex(&principal)
            );
            return Ok(true);
        }

        let updated = registry::consume(key_set);
        self.commit_consumption(&principal, request.key_index, &updated)?;

        info!(
            "[vault] ✅ Consumed key {} for {} ({}/{} used)",
            request.key_index,
            short_hex(&principal),
            updated.used_keys,
            updated.total_keys
        );
        self.events.publish(VaultEvent::KeyConsumed {
            principal,
            key_index: request.key_index,
            remaining_keys: updated.remaining_keys(),
        });
        if updated.is_exhausted() {
            warn!(
                "[vault] ⚠️ Key set exhausted for {} (generation {}): rotate required",
                short_hex(&principal),
                updated.generation
            );
            self.events.publish(VaultEvent::KeysExhausted {
                principal,
                generation: updated.generation,
            });
        }

        Ok(true)
    }

    fn commit_consumption(
        &self,
        principal: &Address,
        key_index: u64,
        updated: &QuantumKeySet,
    ) -> Result<(), VaultError> {
        let batch = vec![
            BatchOperation::put(
                KeyPrefix::used_key_key(principal, key_index),
                USED_MARKER.to_vec(),
            ),
            BatchOperation::put(
                KeyPrefix::key_set_key(principal),
                codec::encode_key_set(updated)?,
            ),
        ];
        self.store.write().atomic_batch_write(batch)?;
        Ok(())
    }

    fn log_rejection(
        &self,
        request: &AuthorizationRequest<SR::Signature>,
        error: VaultError,
    ) -> VaultError {
        match &error {
            VaultError::KeyAlreadyUsed { key_index } => warn!(
                "[vault] 🚫 Replay attempt: key {} of {} already used",
                key_index,
                short_hex(&request.principal)
            ),
            VaultError::InvalidProof | VaultError::InvalidSignature => warn!(
                "[vault] 🚫 Rejected key {} for {}: {}",
                request.key_index,
                short_hex(&request.principal),
                error
            ),
            _ => debug!(
                "[vault] Rejected key {} for {}: {}",
                request.key_index,
                short_hex(&request.principal),
                error
            ),
        }
        error
    }
}
