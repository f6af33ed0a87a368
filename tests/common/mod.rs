//! Shared fixtures for batch integration tests.

use std::time::Duration;

use balance_sweeper::batch::BatchRunner;
use balance_sweeper::blockchain::{AccountKey, MockChainClient};
use balance_sweeper::config::SweeperConfig;

pub const RECIPIENT: &str = "addr-recipient";

/// Configuration mirroring a 6-decimal token with a 5000 base-unit flat fee.
pub fn test_config() -> SweeperConfig {
    let mut config = SweeperConfig::default();
    config.denomination.base = "uzig".into();
    config.denomination.display = "ZIG".into();
    config.denomination.decimals = 6;
    config.fee.gas_price = "0.025".into();
    config.fee.gas_limit = 200_000;
    config.transfer.recipient = RECIPIENT.into();
    config.transfer.explorer_tx_url = "https://zigscan.org/tx/".into();
    config
}

pub fn runner(mock: &MockChainClient) -> BatchRunner<MockChainClient> {
    BatchRunner::from_config(mock.clone(), &test_config()).unwrap()
}

pub fn keys(raw: &[&str]) -> Vec<AccountKey> {
    raw.iter().map(|k| AccountKey::new(*k)).collect()
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
