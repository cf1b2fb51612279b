//! # Command Execution
//!
//! Opens the vault over the configured store and runs one [`Command`],
//! producing a JSON report.

use anyhow::{Context, Result};
use quantum_vault::{
    ChunkCommitmentReconstructor, LoggingEventSink, OneTimeSignature, ProtectionConfigApi,
    QuantumAuthApi, QuantumKeySet, QuantumVaultService, SystemTimeSource, VaultDependencies,
    VaultError,
};
use serde_json::{json, Value};
use shared_types::{to_hex, Address};
use tracing::info;

use crate::cli::{Command, KeySetArgs};
use crate::config::{RuntimeConfig, StorageBackend};
use crate::requests::RequestJson;
use crate::storage::{open_store, RuntimeStore};

/// The vault as assembled by the runtime.
pub type RuntimeVault = QuantumVaultService<RuntimeStore, SystemTimeSource, LoggingEventSink>;

/// Outcome of one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// JSON written to stdout.
    pub body: Value,
    /// `false` when an authorization request was rejected.
    pub success: bool,
}

impl Report {
    fn ok(body: Value) -> Self {
        Self {
            body,
            success: true,
        }
    }
}

/// Open the configured store and build the vault service.
///
/// Persistent backends refuse to start with a zero owner.
pub fn open_vault(config: &RuntimeConfig) -> Result<RuntimeVault> {
    if config.storage.backend != StorageBackend::Memory {
        config.validate_for_production()?;
    }

    let store = open_store(&config.storage).context("failed to open storage")?;
    let vault = QuantumVaultService::new(
        VaultDependencies {
            kv_store: store,
            time_source: SystemTimeSource,
            event_sink: LoggingEventSink,
            reconstructor: ChunkCommitmentReconstructor,
        },
        config.vault.clone(),
    )
    .context("failed to initialize vault")?;

    info!(
        "[vault] Vault ready ({} backend, owner {})",
        config.storage.backend,
        to_hex(&config.vault.owner)
    );
    Ok(vault)
}

/// Run one command against `vault`.
///
/// Registry and settings failures are errors. A rejected `verify` or
/// `consume` is a report with `success == false`.
pub fn execute<V>(vault: &V, config: &RuntimeConfig, command: &Command) -> Result<Report>
where
    V: QuantumAuthApi<Signature = OneTimeSignature> + ProtectionConfigApi,
{
    match command {
        Command::Register(KeySetArgs {
            principal,
            root,
            keys,
        }) => {
            vault
                .register(*principal, *root, *keys)
                .context("register failed")?;
            key_set_report(vault, principal)
        }
        Command::Rotate(KeySetArgs {
            principal,
            root,
            keys,
        }) => {
            vault.rotate(*principal, *root, *keys).context("rotate failed")?;
            key_set_report(vault, principal)
        }
        Command::Revoke { principal } => {
            vault.revoke(*principal).context("revoke failed")?;
            key_set_report(vault, principal)
        }
        Command::Status { principal, index } => {
            let mut report = key_set_report(vault, principal)?;
            report.body["used_indices"] = json!(vault.used_key_indices(principal)?);
            if let Some(index) = index {
                report.body["key_index"] = json!(index);
                report.body["key_used"] = json!(vault.is_key_used(principal, *index)?);
            }
            Ok(report)
        }
        Command::Verify { request } => authorize(vault, request, false),
        Command::Consume { request } => authorize(vault, request, true),
        Command::SetTarget {
            caller,
            target,
            clear,
        } => {
            vault
                .set_protected_target(*caller, *target, !clear)
                .context("set-target failed")?;
            target_report(vault, target)
        }
        Command::Target { target } => target_report(vault, target),
        Command::SetThreshold { caller, value } => {
            vault
                .set_threshold(*caller, *value)
                .context("set-threshold failed")?;
            Ok(Report::ok(json!({ "threshold": value.to_string() })))
        }
        Command::Config => {
            let mut body = config.to_json();
            body["threshold"] = json!(vault.threshold()?.to_string());
            body["store_owner"] = json!(to_hex(&vault.owner()));
            Ok(Report::ok(body))
        }
    }
}

fn authorize<V>(vault: &V, path: &std::path::Path, consume: bool) -> Result<Report>
where
    V: QuantumAuthApi<Signature = OneTimeSignature>,
{
    let request = RequestJson::load(path)
        .and_then(|json| json.decode())
        .with_context(|| format!("invalid request file {}", path.display()))?;

    let outcome = if consume {
        vault.verify_and_consume(&request)
    } else {
        vault.verify(&request)
    };

    let mut body = json!({
        "principal": to_hex(&request.principal),
        "key_index": request.key_index,
        "consumed": false,
    });

    match outcome {
        Ok(authorized) => {
            body["authorized"] = json!(authorized);
            body["consumed"] = json!(consume && authorized);
            body["remaining_keys"] = json!(vault.remaining_keys(&request.principal)?);
            Ok(Report {
                body,
                success: authorized,
            })
        }
        Err(err @ VaultError::Storage(_)) | Err(err @ VaultError::Serialization(_)) => {
            Err(err).context("authorization failed")
        }
        Err(err) => {
            body["authorized"] = json!(false);
            body["error"] = json!(err.to_string());
            body["category"] = json!(format!("{:?}", err.category()));
            Ok(Report {
                body,
                success: false,
            })
        }
    }
}

fn key_set_report<V: QuantumAuthApi>(vault: &V, principal: &Address) -> Result<Report> {
    let key_set = vault.get_key_set(principal)?;
    Ok(Report::ok(json!({
        "principal": to_hex(principal),
        "status": format!("{:?}", vault.key_status(principal)?),
        "protected": vault.has_protection(principal)?,
        "remaining_keys": vault.remaining_keys(principal)?,
        "key_set": key_set.as_ref().map(key_set_json),
    })))
}

fn key_set_json(key_set: &QuantumKeySet) -> Value {
    json!({
        "merkle_root": to_hex(&key_set.merkle_root),
        "total_keys": key_set.total_keys,
        "used_keys": key_set.used_keys,
        "registered_at": key_set.registered_at,
        "active": key_set.active,
        "generation": key_set.generation,
    })
}

fn target_report<V: ProtectionConfigApi>(vault: &V, target: &Address) -> Result<Report> {
    Ok(Report::ok(json!({
        "target": to_hex(target),
        "protected": vault.is_protected_target(target)?,
    })))
}
