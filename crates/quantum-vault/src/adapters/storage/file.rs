use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::memory::{apply_batch, scan_prefix};

/// File-backed key-value store.
///
/// The whole image lives in memory and is rewritten to disk on every
/// mutation via temp file + fsync + rename. A mutation is applied to a copy
/// first; the in-memory image is only replaced once the flush succeeded,
/// so a failed write leaves both disk and memory at the previous state.
///
/// The store holds an exclusive `fs2` lock on `<path>.lock` for its
/// lifetime: two processes can never write the same ledger.
///
/// # Scaling
///
/// Every commit copies the whole map and rewrites the whole file, so the
/// cost of a consume grows with the used-key ledger, which never shrinks.
/// This backend is meant for small deployments and tests. Production
/// deployments should run `vault-runtime` with `--backend rocksdb` (crate
/// feature `rocksdb`), which writes each batch through `RocksDbStore`.
///
/// Format: `[key_len:u32 LE][key][value_len:u32 LE][value]...`
pub struct FileBackedKVStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    path: PathBuf,
    _lock: File,
}

fn io_error(e: std::io::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: e.to_string(),
    }
}

impl FileBackedKVStore {
    /// Open (or create) the store at `path`.
    ///
    /// # Errors
    ///
    /// - `AlreadyLocked` if another handle holds the store
    /// - `Corrupted` if the file is truncated mid-record
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_error)?;
            }
        }

        let lock = Self::acquire_lock(&path)?;

        let data = match File::open(&path) {
            Ok(mut file) => {
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes).map_err(io_error)?;
                tracing::info!(
                    "[vault] 💾 Found existing storage file: {} ({} bytes)",
                    path.display(),
                    bytes.len()
                );
                Self::decode(&bytes)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("[vault] 📁 No existing storage file at {}", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(io_error(e)),
        };

        if !data.is_empty() {
            tracing::info!("[vault] 💾 Loaded {} keys from {}", data.len(), path.display());
        }

        Ok(Self {
            data,
            path,
            _lock: lock,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn acquire_lock(path: &Path) -> Result<File, KVStoreError> {
        let lock_path = path.with_extension("lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(io_error)?;
        file.try_lock_exclusive()
            .map_err(|_| KVStoreError::AlreadyLocked {
                path: lock_path.display().to_string(),
            })?;
        Ok(file)
    }

    fn decode(bytes: &[u8]) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, KVStoreError> {
        let mut data = BTreeMap::new();
        let mut cursor = 0;

        while cursor < bytes.len() {
            let key = Self::read_field(bytes, &mut cursor)?;
            let value = Self::read_field(bytes, &mut cursor)?;
            data.insert(key, value);
        }

        Ok(data)
    }

    fn read_field(bytes: &[u8], cursor: &mut usize) -> Result<Vec<u8>, KVStoreError> {
        let truncated = |at: usize| KVStoreError::Corrupted {
            message: format!("truncated record at byte {}", at),
        };

        let len_end = cursor.checked_add(4).ok_or_else(|| truncated(*cursor))?;
        let len_bytes: [u8; 4] = bytes
            .get(*cursor..len_end)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| truncated(*cursor))?;
        let len = u32::from_le_bytes(len_bytes) as usize;

        let end = len_end.checked_add(len).ok_or_else(|| truncated(len_end))?;
        let field = bytes.get(len_end..end).ok_or_else(|| truncated(len_end))?;
        *cursor = end;
        Ok(field.to_vec())
    }

    fn encode(data: &BTreeMap<Vec<u8>, Vec<u8>>) -> Vec<u8> {
        let mut bytes = Vec::new();
        for (key, value) in data {
            bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
            bytes.extend_from_slice(key);
            bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
            bytes.extend_from_slice(value);
        }
        bytes
    }

    fn save(&self, data: &BTreeMap<Vec<u8>, Vec<u8>>) -> Result<(), KVStoreError> {
        let bytes = Self::encode(data);

        let temp_path = self.path.with_extension("tmp");
        let mut file = File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;

        std::fs::rename(&temp_path, &self.path).map_err(io_error)
    }

    /// Apply `operations` to a copy, persist it, then swap it in.
    ///
    /// O(total entries) per call regardless of batch size.
    fn commit(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut next = self.data.clone();
        apply_batch(&mut next, operations);
        self.save(&next)?;
        self.data = next;
        Ok(())
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.commit(vec![BatchOperation::put(key, value)])
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.commit(vec![BatchOperation::delete(key)])
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.commit(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        Ok(scan_prefix(&self.data, prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reopen_preserves_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");

        {
            let mut store = FileBackedKVStore::open(&path).unwrap();
            store
                .atomic_batch_write(vec![
                    BatchOperation::put(b"ks:a".to_vec(), vec![1, 2, 3]),
                    BatchOperation::put(b"ul:a".to_vec(), vec![1]),
                ])
                .unwrap();
        }

        let store = FileBackedKVStore::open(&path).unwrap();
        assert_eq!(store.get(b"ks:a").unwrap(), Some(vec![1, 2, 3]));
        assert!(store.exists(b"ul:a").unwrap());
    }

    #[test]
    fn test_second_handle_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");

        let _first = FileBackedKVStore::open(&path).unwrap();
        let second = FileBackedKVStore::open(&path);
        assert!(matches!(second, Err(KVStoreError::AlreadyLocked { .. })));
    }

    #[test]
    fn test_truncated_file_is_corrupted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");

        let mut bytes = FileBackedKVStore::encode(&BTreeMap::from([(
            b"key".to_vec(),
            b"value".to_vec(),
        )]));
        bytes.truncate(bytes.len() - 2);
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(
            FileBackedKVStore::open(&path),
            Err(KVStoreError::Corrupted { .. })
        ));
    }

    #[test]
    fn test_growing_ledger_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");

        {
            let mut store = FileBackedKVStore::open(&path).unwrap();
            for i in 0..256u32 {
                let mut key = b"ul:".to_vec();
                key.extend_from_slice(&i.to_be_bytes());
                store
                    .atomic_batch_write(vec![
                        BatchOperation::put(key, vec![1]),
                        BatchOperation::put(b"ks:a".to_vec(), i.to_le_bytes().to_vec()),
                    ])
                    .unwrap();
            }
        }

        let store = FileBackedKVStore::open(&path).unwrap();
        assert_eq!(store.prefix_scan(b"ul:").unwrap().len(), 256);
        assert_eq!(store.get(b"ks:a").unwrap(), Some(255u32.to_le_bytes().to_vec()));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_delete_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");

        {
            let mut store = FileBackedKVStore::open(&path).unwrap();
            store.put(b"a", b"1").unwrap();
            store.put(b"b", b"2").unwrap();
            store.delete(b"a").unwrap();
        }

        let store = FileBackedKVStore::open(&path).unwrap();
        assert_eq!(store.prefix_scan(b"").unwrap().len(), 1);
        assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
    }
}
