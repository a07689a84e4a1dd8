mod commands;

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use bank_ledger::Bank;
use clap::Parser;
use commands::Args;

fn open(path: &Path, what: &str) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open {what} file: {}", path.display()))
}

fn main() -> Result<()> {
    // Parse the CLI arguments
    let args = Args::parse();

    // Initialize logger with default level of info (can be overridden with RUST_LOG)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. Open the accounts, restoring their history if one was given
    log::info!("Loading accounts from {}", args.accounts.display());
    let accounts = open(&args.accounts, "accounts")?;
    let mut bank = match &args.history {
        Some(history) => Bank::load(accounts, open(history, "history")?),
        None => Bank::load_accounts(accounts),
    }
    .context("Failed to load accounts")?;

    // 2. Replay the operations
    log::info!(
        "Processing operations from {}",
        args.operations_file.display()
    );
    let operations = open(&args.operations_file, "operations")?;
    bank.process_operations(operations)
        .context("Failed to process operations")?;

    // 3. Export to stdout
    match args.statement {
        Some(account) => bank
            .export_statement(account, std::io::stdout())
            .with_context(|| format!("Failed to export statement for account {account}"))?,
        None => bank
            .export_balances(std::io::stdout())
            .context("Failed to export balances to stdout")?,
    }

    log::info!("Export complete");

    Ok(())
}
