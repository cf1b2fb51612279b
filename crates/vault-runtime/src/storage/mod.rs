//! # Storage Backends
//!
//! Opens the `KeyValueStore` selected by [`StorageSettings`].
//!
//! | Backend | Adapter | Durability |
//! |---------|---------|------------|
//! | `file` | `FileBackedKVStore` | snapshot file, fsync + rename per commit |
//! | `memory` | `InMemoryKVStore` | none |
//! | `rocksdb` | [`RocksDbStore`] | WAL + fsync (feature `rocksdb`) |
//!
//! The file backend rewrites its whole snapshot on every commit, so its
//! write cost grows with the used-key ledger. Use it for small deployments;
//! production vaults should build with `--features rocksdb` and run
//! `--backend rocksdb`.

#[cfg(feature = "rocksdb")]
mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};

use quantum_vault::{
    BatchOperation, FileBackedKVStore, InMemoryKVStore, KVStoreError, KeyValueStore, ScanResult,
};
use thiserror::Error;
use tracing::info;

use crate::config::{StorageBackend, StorageSettings};

/// Errors opening a storage backend.
#[derive(Debug, Error)]
pub enum StorageSetupError {
    /// The data directory could not be created.
    #[error("Cannot create data directory {path}: {source}")]
    DataDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend refused to open.
    #[error(transparent)]
    Store(#[from] KVStoreError),

    /// The backend was not compiled in.
    #[error("Storage backend {0} is not available in this build")]
    Unavailable(StorageBackend),
}

/// The store chosen at startup.
pub enum RuntimeStore {
    Memory(InMemoryKVStore),
    File(FileBackedKVStore),
    #[cfg(feature = "rocksdb")]
    RocksDb(RocksDbStore),
}

macro_rules! dispatch {
    ($self:expr, $store:ident => $body:expr) => {
        match $self {
            RuntimeStore::Memory($store) => $body,
            RuntimeStore::File($store) => $body,
            #[cfg(feature = "rocksdb")]
            RuntimeStore::RocksDb($store) => $body,
        }
    };
}

impl RuntimeStore {
    /// Backend of this store.
    pub fn backend(&self) -> StorageBackend {
        match self {
            RuntimeStore::Memory(_) => StorageBackend::Memory,
            RuntimeStore::File(_) => StorageBackend::File,
            #[cfg(feature = "rocksdb")]
            RuntimeStore::RocksDb(_) => StorageBackend::RocksDb,
        }
    }
}

impl KeyValueStore for RuntimeStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        dispatch!(self, store => store.get(key))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        dispatch!(self, store => store.put(key, value))
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        dispatch!(self, store => store.delete(key))
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        dispatch!(self, store => store.atomic_batch_write(operations))
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        dispatch!(self, store => store.exists(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        dispatch!(self, store => store.prefix_scan(prefix))
    }
}

/// Open the configured backend, creating the data directory if needed.
pub fn open_store(settings: &StorageSettings) -> Result<RuntimeStore, StorageSetupError> {
    if settings.backend == StorageBackend::Memory {
        info!("[vault] 💾 Using in-memory storage (nothing is persisted)");
        return Ok(RuntimeStore::Memory(InMemoryKVStore::new()));
    }

    std::fs::create_dir_all(&settings.data_dir).map_err(|source| StorageSetupError::DataDir {
        path: settings.data_dir.display().to_string(),
        source,
    })?;

    match settings.backend {
        StorageBackend::File => {
            let path = settings.vault_file();
            let store = FileBackedKVStore::open(&path)?;
            info!("[vault] 💾 Opened file store at {}", path.display());
            Ok(RuntimeStore::File(store))
        }
        StorageBackend::RocksDb => open_rocksdb(settings),
        StorageBackend::Memory => Ok(RuntimeStore::Memory(InMemoryKVStore::new())),
    }
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(settings: &StorageSettings) -> Result<RuntimeStore, StorageSetupError> {
    let store = RocksDbStore::open(RocksDbConfig::at(settings.rocksdb_dir()))?;
    info!("[vault] 💾 Opened RocksDB at {}", store.path().display());
    Ok(RuntimeStore::RocksDb(store))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(_settings: &StorageSettings) -> Result<RuntimeStore, StorageSetupError> {
    Err(StorageSetupError::Unavailable(StorageBackend::RocksDb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings(backend: StorageBackend, dir: &TempDir) -> StorageSettings {
        StorageSettings {
            backend,
            data_dir: dir.path().join("nested"),
        }
    }

    #[test]
    fn test_memory_backend() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&settings(StorageBackend::Memory, &dir)).unwrap();
        assert_eq!(store.backend(), StorageBackend::Memory);

        store.put(b"k", b"v").unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
        assert!(!dir.path().join("nested").exists());
    }

    #[test]
    fn test_file_backend_creates_data_dir() {
        let dir = TempDir::new().unwrap();
        let settings = settings(StorageBackend::File, &dir);
        {
            let mut store = open_store(&settings).unwrap();
            assert_eq!(store.backend(), StorageBackend::File);
            store
                .atomic_batch_write(vec![BatchOperation::put(b"ks:a".to_vec(), vec![1])])
                .unwrap();
        }

        let store = open_store(&settings).unwrap();
        assert!(store.exists(b"ks:a").unwrap());
        assert!(settings.vault_file().exists());
    }

    #[test]
    fn test_file_backend_is_single_writer() {
        let dir = TempDir::new().unwrap();
        let settings = settings(StorageBackend::File, &dir);

        let _first = open_store(&settings).unwrap();
        let second = open_store(&settings);
        assert!(matches!(
            second,
            Err(StorageSetupError::Store(KVStoreError::AlreadyLocked { .. }))
        ));
    }

    #[cfg(not(feature = "rocksdb"))]
    #[test]
    fn test_rocksdb_unavailable_without_feature() {
        let dir = TempDir::new().unwrap();
        let result = open_store(&settings(StorageBackend::RocksDb, &dir));
        assert!(matches!(
            result,
            Err(StorageSetupError::Unavailable(StorageBackend::RocksDb))
        ));
    }
}
