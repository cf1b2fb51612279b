//! # Quantum-Vault Runtime
//!
//! Assembles the vault service for operators.
//!
//! ## Modules
//!
//! - `config/` - `RuntimeConfig` from defaults, `QV_*` environment and flags
//! - `storage/` - backend selection (file, memory, RocksDB)
//! - `requests/` - JSON authorization request files
//! - `cli/` - `clap` command definitions
//! - `commands/` - opens the vault and runs one command
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (env, then CLI flags)
//! 2. Refuse a zero owner for persistent backends
//! 3. Open the store (exclusive lock for the file backend)
//! 4. Pin or check the store owner
//! 5. Run the command and print a JSON report

pub mod cli;
pub mod commands;
pub mod config;
pub mod requests;
pub mod storage;

pub use cli::{Cli, Command, KeySetArgs};
pub use commands::{execute, open_vault, Report, RuntimeVault};
pub use config::{ConfigError, RuntimeConfig, StorageBackend, StorageSettings};
pub use requests::{RequestError, RequestJson};
pub use storage::{open_store, RuntimeStore, StorageSetupError};
