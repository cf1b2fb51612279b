//! # Quantum Vault Service
//!
//! The application service implementing the vault API.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `QuantumAuthApi` (registry + authorization gate)
//! 2. Implements `ProtectionConfigApi` (owner-gated settings)
//! 3. Serializes every mutation per principal and commits it in one batch
//! 4. Uses dependency injection for storage, clock, event sink and the
//!    signature scheme
//!
//! ## Locking
//!
//! ```text
//! principal lock (Mutex)  ── held from first read to commit
//!   └── store lock (RwLock) ── read guard for the state snapshot,
//!                              write guard only for the batch commit
//! ```
//!
//! Signature and proof hashing run with no store guard held.

mod api;
mod codec;
mod gate;
mod locks;
mod protection;
mod registry;

use parking_lot::RwLock;
use shared_types::short_hex;
use tracing::info;

use crate::adapters::{InMemoryKVStore, SystemTimeSource};
use crate::domain::errors::VaultError;
use crate::domain::protection::decode_owner;
use crate::domain::signature::{ChunkCommitmentReconstructor, SignatureReconstructor};
use crate::domain::value_objects::{KeyPrefix, VaultConfig};
use crate::ports::outbound::{KeyValueStore, NoopEventSink, TimeSource, VaultEventSink};
use locks::PrincipalLocks;

/// The Quantum Vault Service.
///
/// Generic over its driven ports and over the signature scheme; the
/// simplified chunk-commitment scheme is the default.
pub struct QuantumVaultService<KV, TS, EV, SR = ChunkCommitmentReconstructor>
where
    KV: KeyValueStore,
    TS: TimeSource,
    EV: VaultEventSink,
    SR: SignatureReconstructor,
{
    /// Key-value store holding key sets, ledger and settings.
    pub(crate) store: RwLock<KV>,
    /// Clock for registration times and the revoke cooldown.
    pub(crate) time_source: TS,
    /// Receives events after commit.
    pub(crate) events: EV,
    /// Signature scheme.
    pub(crate) reconstructor: SR,
    /// Service configuration.
    pub(crate) config: VaultConfig,
    /// Per-principal mutation locks.
    pub(crate) locks: PrincipalLocks,
}

/// Dependencies for QuantumVaultService
pub struct VaultDependencies<KV, TS, EV, SR = ChunkCommitmentReconstructor> {
    pub kv_store: KV,
    pub time_source: TS,
    pub event_sink: EV,
    pub reconstructor: SR,
}

impl<KV, TS, EV, SR> QuantumVaultService<KV, TS, EV, SR>
where
    KV: KeyValueStore,
    TS: TimeSource,
    EV: VaultEventSink,
    SR: SignatureReconstructor,
{
    /// Create the service over the given dependencies.
    ///
    /// On first start the configured owner is persisted. A store that was
    /// created under a different owner is refused.
    ///
    /// # Errors
    ///
    /// - `OwnerMismatch`: the store belongs to another owner
    /// - `Storage` / `Serialization`: the owner record could not be read or written
    pub fn new(
        deps: VaultDependencies<KV, TS, EV, SR>,
        config: VaultConfig,
    ) -> Result<Self, VaultError> {
        let mut kv_store = deps.kv_store;

        match kv_store.get(KeyPrefix::OWNER)? {
            Some(bytes) => {
                let stored = decode_owner(&bytes)?;
                if stored != config.owner {
                    return Err(VaultError::OwnerMismatch {
                        stored,
                        configured: config.owner,
                    });
                }
            }
            None => {
                kv_store.put(KeyPrefix::OWNER, &config.owner)?;
                info!("[vault] Initialized store owner {}", short_hex(&config.owner));
            }
        }

        Ok(Self {
            store: RwLock::new(kv_store),
            time_source: deps.time_source,
            events: deps.event_sink,
            reconstructor: deps.reconstructor,
            config,
            locks: PrincipalLocks::new(),
        })
    }

    /// Service configuration.
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// The event sink (e.g. to subscribe to a broadcast sink).
    pub fn events(&self) -> &EV {
        &self.events
    }

    /// Consume the service and return its store.
    pub fn into_store(self) -> KV {
        self.store.into_inner()
    }
}

impl QuantumVaultService<InMemoryKVStore, SystemTimeSource, NoopEventSink> {
    /// An in-memory service on the system clock with events discarded.
    pub fn new_in_memory(config: VaultConfig) -> Result<Self, VaultError> {
        Self::new(
            VaultDependencies {
                kv_store: InMemoryKVStore::new(),
                time_source: SystemTimeSource,
                event_sink: NoopEventSink,
                reconstructor: ChunkCommitmentReconstructor,
            },
            config,
        )
    }
}
