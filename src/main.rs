//! Balance sweeper.
//!
//! Drains every account listed in a key file into one recipient address.
//!
//! # Architecture Overview
//!
//! ```text
//!   pk.txt ──▶ batch::keys ──▶ batch::runner ──┐  (one account at a time,
//!                                              │   pacing delay between)
//!                                              ▼
//!                                   resilience::retries  (429 → backoff)
//!                                              │
//!                                              ▼
//!                                   disburse::procedure  (balance - fee)
//!                                              │
//!                                              ▼
//!                                   blockchain::client   (alloy, JSON-RPC)
//! ```

use std::path::PathBuf;

use clap::Parser;

use balance_sweeper::batch::{load_keys, BatchRunner};
use balance_sweeper::blockchain::{ChainAdapter, EvmChainClient};
use balance_sweeper::config::resolve_config;
use balance_sweeper::disburse::FeeSpec;
use balance_sweeper::observability::init_logging;

#[derive(Parser)]
#[command(name = "balance-sweeper")]
#[command(about = "Sweep the balances of many accounts into one recipient", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recipient address, overriding `transfer.recipient`.
    #[arg(short, long)]
    recipient: Option<String>,

    /// Path to the key file (one hex private key per line).
    #[arg(short, long, default_value = "pk.txt")]
    keys: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref(), cli.recipient.as_deref())?;

    init_logging(&config.observability.log_level);

    tracing::info!("balance-sweeper v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        rpc_url = %config.chain.rpc_url,
        chain_id = config.chain.chain_id,
        recipient = %config.transfer.recipient,
        gas_price = %config.fee.gas_price,
        gas_limit = config.fee.gas_limit,
        max_attempts = config.retries.max_attempts,
        "Configuration loaded"
    );

    let client = EvmChainClient::new(config.chain.clone(), config.denomination.base.clone())?;
    client.validate_address(&config.transfer.recipient)?;
    client.validate_fee(&FeeSpec::from_config(&config.fee)?)?;

    let keys = load_keys(&cli.keys)?;
    tracing::info!(path = %cli.keys.display(), accounts = keys.len(), "Keys loaded");

    let runner = BatchRunner::from_config(client, &config)?;
    runner.run(&keys).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
