//! # Runtime Configuration
//!
//! Storage selection and the vault's owning authority.
//!
//! ## Sources (later wins)
//!
//! 1. Defaults (`./data`, file backend, zero owner)
//! 2. Environment: `QV_DATA_DIR`, `QV_STORAGE_BACKEND`, `QV_OWNER`
//! 3. CLI flags
//!
//! ## Security Requirements
//!
//! - `owner` MUST NOT be the zero address for a persistent store

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use quantum_vault::VaultConfig;
use shared_types::{address_from_hex, is_zero_address, to_hex, HexDecodeError};
use thiserror::Error;

/// Environment variable naming the data directory.
pub const ENV_DATA_DIR: &str = "QV_DATA_DIR";
/// Environment variable selecting the storage backend.
pub const ENV_STORAGE_BACKEND: &str = "QV_STORAGE_BACKEND";
/// Environment variable carrying the owner address (40 hex chars).
pub const ENV_OWNER: &str = "QV_OWNER";

/// File name of the file-backed store inside the data directory.
pub const VAULT_FILE_NAME: &str = "vault.db";
/// Directory name of the RocksDB store inside the data directory.
pub const ROCKSDB_DIR_NAME: &str = "rocksdb";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Owner is the zero address.
    #[error(
        "SECURITY VIOLATION: vault owner is the zero address. \
         Set QV_OWNER or pass --owner."
    )]
    ZeroOwner,

    /// Owner text is not a 20-byte hex address.
    #[error("Invalid owner address {value:?}: {source}")]
    InvalidOwner {
        value: String,
        #[source]
        source: HexDecodeError,
    },

    /// Unknown storage backend name.
    #[error("Unknown storage backend {0:?} (expected file, memory or rocksdb)")]
    UnknownBackend(String),
}

/// Where the vault keeps its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Single snapshot file with an exclusive lock (default).
    #[default]
    File,
    /// Process memory; nothing survives exit.
    Memory,
    /// RocksDB directory (requires the `rocksdb` feature).
    RocksDb,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" | "mem" => Ok(Self::Memory),
            "rocksdb" | "rocks" => Ok(Self::RocksDb),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Memory => "memory",
            Self::RocksDb => "rocksdb",
        })
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    /// Selected backend.
    pub backend: StorageBackend,
    /// Data directory for persistent backends.
    pub data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl StorageSettings {
    /// Path of the file-backed store.
    pub fn vault_file(&self) -> PathBuf {
        self.data_dir.join(VAULT_FILE_NAME)
    }

    /// Path of the RocksDB directory.
    pub fn rocksdb_dir(&self) -> PathBuf {
        self.data_dir.join(ROCKSDB_DIR_NAME)
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Storage configuration.
    pub storage: StorageSettings,
    /// Vault service configuration.
    pub vault: VaultConfig,
}

impl RuntimeConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Override fields from a variable lookup.
    ///
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(dir) = var(ENV_DATA_DIR) {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(backend) = var(ENV_STORAGE_BACKEND) {
            self.storage.backend = backend.parse()?;
        }
        if let Some(owner) = var(ENV_OWNER) {
            self.set_owner(&owner)?;
        }
        Ok(())
    }

    /// Parse and set the owner address.
    pub fn set_owner(&mut self, value: &str) -> Result<(), ConfigError> {
        let owner = address_from_hex(value).map_err(|source| ConfigError::InvalidOwner {
            value: value.to_string(),
            source,
        })?;
        self.vault.owner = owner;
        Ok(())
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the owner is the zero address
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if is_zero_address(&self.vault.owner) {
            return Err(ConfigError::ZeroOwner);
        }
        Ok(())
    }

    /// JSON view for the `config` command.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "backend": self.storage.backend.to_string(),
            "data_dir": self.storage.data_dir.display().to_string(),
            "owner": to_hex(&self.vault.owner),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.vault_file(), PathBuf::from("./data/vault.db"));
        assert!(config.validate_for_production().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RuntimeConfig::default();
        config
            .apply_env(env(&[
                (ENV_DATA_DIR, "/var/lib/vault"),
                (ENV_STORAGE_BACKEND, "RocksDB"),
                (ENV_OWNER, "0x0101010101010101010101010101010101010101"),
            ]))
            .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/vault"));
        assert_eq!(config.storage.backend, StorageBackend::RocksDb);
        assert_eq!(config.vault.owner, [0x01; 20]);
        assert!(config.validate_for_production().is_ok());
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut config = RuntimeConfig::default();
        config
            .apply_env(env(&[(ENV_DATA_DIR, ""), (ENV_STORAGE_BACKEND, "  ")]))
            .unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_bad_owner_rejected() {
        let mut config = RuntimeConfig::default();
        let err = config
            .apply_env(env(&[(ENV_OWNER, "0x1234")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOwner { .. }));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = "postgres".parse::<StorageBackend>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBackend(name) if name == "postgres"));
    }

    #[test]
    fn test_json_view() {
        let mut config = RuntimeConfig::default();
        config.set_owner("ffffffffffffffffffffffffffffffffffffffff").unwrap();
        let json = config.to_json();
        assert_eq!(json["backend"], "file");
        assert_eq!(json["owner"], "0xffffffffffffffffffffffffffffffffffffffff");
    }
}
