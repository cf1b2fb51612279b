//! # Command Line
//!
//! `clap` definitions for the `vault-runtime` binary. Global flags override
//! the `QV_*` environment variables.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use shared_types::{address_from_hex, hash_from_hex, Address, Hash, KeyIndex, U256};

use crate::config::{ConfigError, RuntimeConfig, StorageBackend};

/// Quantum-Vault: one-time-signature authorization vault
#[derive(Parser, Debug)]
#[command(name = "vault-runtime", version)]
#[command(about = "Administer a quantum-resistant one-time-signature vault")]
pub struct Cli {
    /// Data directory (overrides QV_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage backend: file, memory or rocksdb (overrides QV_STORAGE_BACKEND)
    #[arg(long, global = true, value_parser = parse_backend)]
    pub backend: Option<StorageBackend>,

    /// Owning authority, 20-byte hex (overrides QV_OWNER)
    #[arg(long, global = true, value_parser = parse_address)]
    pub owner: Option<Address>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Apply the global flags on top of `config`.
    pub fn apply_overrides(&self, config: &mut RuntimeConfig) {
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = dir.clone();
        }
        if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
        if let Some(owner) = self.owner {
            config.vault.owner = owner;
        }
    }
}

/// Vault operations.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register a key set for a principal
    Register(KeySetArgs),
    /// Replace a principal's active key set
    Rotate(KeySetArgs),
    /// Deactivate a principal's key set (7-day cooldown)
    Revoke {
        #[arg(long, value_parser = parse_address)]
        principal: Address,
    },
    /// Show a principal's key set, status and consumed indices
    Status {
        #[arg(long, value_parser = parse_address)]
        principal: Address,
        /// Also report whether this key index is consumed
        #[arg(long)]
        index: Option<KeyIndex>,
    },
    /// Check an authorization request without consuming the key
    Verify {
        /// JSON request file
        #[arg(long)]
        request: PathBuf,
    },
    /// Check an authorization request and consume the key
    Consume {
        /// JSON request file
        #[arg(long)]
        request: PathBuf,
    },
    /// Flag or unflag a target as requiring quantum authorization
    SetTarget {
        #[arg(long, value_parser = parse_address)]
        caller: Address,
        #[arg(long, value_parser = parse_address)]
        target: Address,
        /// Clear the flag instead of setting it
        #[arg(long)]
        clear: bool,
    },
    /// Show a target's protection flag
    Target {
        #[arg(long, value_parser = parse_address)]
        target: Address,
    },
    /// Set the value threshold (decimal, or 0x-prefixed hex)
    SetThreshold {
        #[arg(long, value_parser = parse_address)]
        caller: Address,
        #[arg(long, value_parser = parse_u256)]
        value: U256,
    },
    /// Show the effective configuration and current threshold
    Config,
}

/// Arguments of `register` and `rotate`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct KeySetArgs {
    #[arg(long, value_parser = parse_address)]
    pub principal: Address,
    /// Merkle root over the one-time public-key commitments
    #[arg(long, value_parser = parse_hash)]
    pub root: Hash,
    /// Number of keys (power of two)
    #[arg(long)]
    pub keys: u64,
}

fn parse_address(value: &str) -> Result<Address, String> {
    address_from_hex(value).map_err(|e| e.to_string())
}

fn parse_hash(value: &str) -> Result<Hash, String> {
    hash_from_hex(value).map_err(|e| e.to_string())
}

fn parse_backend(value: &str) -> Result<StorageBackend, String> {
    value.parse().map_err(|e: ConfigError| e.to_string())
}

fn parse_u256(value: &str) -> Result<U256, String> {
    let value = value.trim();
    match value.strip_prefix("0x") {
        Some(digits) => U256::from_str_radix(digits, 16).map_err(|e| e.to_string()),
        None => U256::from_dec_str(value).map_err(|e| e.to_string()),
    }
}
