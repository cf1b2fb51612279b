//! # vault-runtime
//!
//! Administrative entry point for a Quantum-Vault store.
//!
//! ```text
//! vault-runtime --owner 0x… register --principal 0x… --root 0x… --keys 1024
//! vault-runtime consume --request request.json
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); the JSON report goes to
//! stdout. Exit status is 1 on errors and on rejected requests.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use vault_runtime::{execute, open_vault, Cli, RuntimeConfig};

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("[vault] {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    let mut config = RuntimeConfig::from_env().context("invalid environment configuration")?;
    cli.apply_overrides(&mut config);

    let vault = open_vault(&config)?;
    let report = execute(&vault, &config, &cli.command)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&report.body).context("failed to render report")?
    );
    Ok(report.success)
}
