//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the sweeper.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a sweep run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SweeperConfig {
    /// RPC endpoint and chain identity.
    pub chain: ChainConfig,

    /// Base and display denominations.
    pub denomination: DenominationConfig,

    /// Gas price and gas limit used to derive the flat fee.
    pub fee: FeeConfig,

    /// Recipient and block explorer settings.
    pub transfer: TransferConfig,

    /// Retry configuration for rate-limited attempts.
    pub retries: RetryConfig,

    /// Inter-account pacing.
    pub pacing: PacingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
        }
    }
}

/// Denomination configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DenominationConfig {
    /// Smallest indivisible unit, used for all arithmetic.
    pub base: String,

    /// Human-readable unit shown in logs.
    pub display: String,

    /// Number of decimal places between base and display units.
    pub decimals: u32,
}

impl Default for DenominationConfig {
    fn default() -> Self {
        Self {
            base: "wei".to_string(),
            display: "ETH".to_string(),
            decimals: 18,
        }
    }
}

/// Fee configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Gas price in base units per gas, as a decimal string (e.g. "1000000000").
    ///
    /// Fractional prices are accepted here; the EVM adapter rejects them at
    /// startup because legacy transfers carry whole base units per gas.
    pub gas_price: String,

    /// Gas limit attached to every transfer.
    pub gas_limit: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            gas_price: "1000000000".to_string(),
            gas_limit: 21_000,
        }
    }
}

/// Transfer destination configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Address receiving every swept balance.
    pub recipient: String,

    /// Explorer URL prefix; the transaction hash is appended.
    pub explorer_tx_url: String,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            recipient: String::new(),
            explorer_tx_url: "https://etherscan.io/tx/".to_string(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per account.
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds; doubles after each retry.
    pub initial_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 2000,
        }
    }
}

/// Pacing between accounts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Delay after each account in milliseconds.
    pub account_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            account_delay_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
