//! EVM chain adapter over JSON-RPC with timeout and error handling.
//!
//! # Responsibilities
//! - Derive signer identities from hex private keys
//! - Open a signing provider per attempt and verify the chain ID
//! - Query native balances and broadcast value transfers
//! - Classify transport failures (HTTP 429 → rate limited)

use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::{RpcError, TransportError, TransportErrorKind};
use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use tokio::time::timeout;

use crate::blockchain::adapter::{ChainAdapter, ChainSession};
use crate::blockchain::types::{
    Account, AccountKey, Balance, ChainError, ChainResult, RpcErrorKind, TxHash,
};
use crate::blockchain::wallet::Wallet;
use crate::config::ChainConfig;
use crate::disburse::fee::FeeSpec;
use crate::disburse::types::TransferPlan;

const HTTP_TOO_MANY_REQUESTS: u16 = 429;

/// Chain adapter for EVM-compatible networks.
#[derive(Clone)]
pub struct EvmChainClient {
    rpc_url: url::Url,
    config: ChainConfig,
    /// Name of the native coin's base unit (e.g. "wei").
    native_denom: String,
    timeout_duration: Duration,
}

impl EvmChainClient {
    /// Create a new chain client.
    ///
    /// No network traffic happens here; the endpoint is contacted on `connect`.
    pub fn new(config: ChainConfig, native_denom: impl Into<String>) -> ChainResult<Self> {
        let rpc_url: url::Url = config.rpc_url.parse().map_err(|e| ChainError::Connection {
            message: format!("Invalid RPC URL '{}': {}", config.rpc_url, e),
            rate_limited: false,
        })?;

        Ok(Self {
            rpc_url,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            native_denom: native_denom.into(),
            config,
        })
    }

}

#[async_trait]
impl ChainAdapter for EvmChainClient {
    type Session = EvmSession;

    fn derive_identity(&self, key: &AccountKey) -> ChainResult<Account> {
        let wallet = Wallet::from_private_key(key)?;
        Ok(Account {
            address: wallet.address().to_checksum(None),
            key: key.clone(),
        })
    }

    fn validate_address(&self, address: &str) -> ChainResult<()> {
        parse_address(address).map(|_| ())
    }

    fn validate_fee(&self, fee: &FeeSpec) -> ChainResult<()> {
        legacy_gas_price(fee).map(|_| ())
    }

    async fn connect(&self, account: &Account) -> ChainResult<EvmSession> {
        let wallet = Wallet::from_private_key(&account.key)?;
        let from = wallet.address();

        let provider = ProviderBuilder::new()
            .wallet(wallet.into_network_wallet())
            .connect_http(self.rpc_url.clone());

        let session = EvmSession {
            provider: Arc::new(provider),
            from,
            chain_id: self.config.chain_id,
            native_denom: self.native_denom.clone(),
            timeout_duration: self.timeout_duration,
            timeout_secs: self.config.rpc_timeout_secs,
        };

        session.verify_chain_id().await?;

        tracing::debug!(
            address = %from,
            rpc_url = %self.rpc_url,
            chain_id = self.config.chain_id,
            "Session connected"
        );

        Ok(session)
    }
}

impl std::fmt::Debug for EvmChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

/// Signing provider bound to one account.
pub struct EvmSession {
    provider: Arc<dyn Provider + Send + Sync>,
    from: Address,
    chain_id: u64,
    native_denom: String,
    timeout_duration: Duration,
    timeout_secs: u64,
}

impl EvmSession {
    /// Verify the connected chain ID matches configuration.
    async fn verify_chain_id(&self) -> ChainResult<()> {
        let actual = match timeout(self.timeout_duration, self.provider.get_chain_id()).await {
            Ok(Ok(id)) => id,
            Ok(Err(e)) => {
                return Err(ChainError::Connection {
                    rate_limited: classify(&e) == RpcErrorKind::RateLimited,
                    message: e.to_string(),
                })
            }
            Err(_) => return Err(ChainError::Timeout(self.timeout_secs)),
        };

        if actual != self.chain_id {
            return Err(ChainError::ChainMismatch {
                expected: self.chain_id,
                actual,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChainSession for EvmSession {
    async fn get_balance(&self, address: &str, denom: &str) -> ChainResult<Balance> {
        if denom != self.native_denom {
            return Err(ChainError::rpc(
                RpcErrorKind::Other,
                format!(
                    "unsupported denomination '{}', only native '{}' is available",
                    denom, self.native_denom
                ),
            ));
        }
        let owner = parse_address(address)?;

        let raw = match timeout(self.timeout_duration, self.provider.get_balance(owner)).await {
            Ok(Ok(balance)) => balance,
            Ok(Err(e)) => return Err(ChainError::rpc(classify(&e), e.to_string())),
            Err(_) => return Err(ChainError::Timeout(self.timeout_secs)),
        };

        let amount = u128::try_from(raw).map_err(|_| {
            ChainError::rpc(
                RpcErrorKind::Other,
                format!("balance {} of {} exceeds supported range", raw, owner),
            )
        })?;

        Ok(Balance {
            amount,
            denom: denom.to_string(),
        })
    }

    async fn send_tokens(&self, plan: &TransferPlan) -> ChainResult<TxHash> {
        let to = parse_address(&plan.to)?;
        let gas_price = legacy_gas_price(&plan.fee)?;

        let tx = TransactionRequest::default()
            .with_from(self.from)
            .with_to(to)
            .with_value(U256::from(plan.send_amount))
            .with_gas_limit(plan.fee.gas_limit)
            .with_gas_price(gas_price)
            .with_chain_id(self.chain_id);

        let sent = timeout(self.timeout_duration, self.provider.send_transaction(tx)).await;
        let pending = match sent {
            Ok(Ok(pending)) => pending,
            Ok(Err(RpcError::ErrorResp(payload)))
                if payload.code != i64::from(HTTP_TOO_MANY_REQUESTS) =>
            {
                return Err(ChainError::BroadcastRejected(payload.message.to_string()))
            }
            Ok(Err(e)) => return Err(ChainError::rpc(classify(&e), e.to_string())),
            Err(_) => return Err(ChainError::Timeout(self.timeout_secs)),
        };

        Ok(TxHash(format!("{:#x}", pending.tx_hash())))
    }

    async fn disconnect(self) -> ChainResult<()> {
        // HTTP transport holds no server-side session; dropping the provider is enough.
        tracing::debug!(address = %self.from, "Session released");
        Ok(())
    }
}

fn parse_address(address: &str) -> ChainResult<Address> {
    address.trim().parse().map_err(|e| ChainError::InvalidAddress {
        address: address.to_string(),
        reason: format!("{}", e),
    })
}

/// Per-gas price for a legacy transfer.
///
/// The node only accepts whole base units per gas, so the configured price
/// must be a positive integer; `gas_price * gas_limit` then equals the flat fee.
fn legacy_gas_price(fee: &FeeSpec) -> ChainResult<u128> {
    if !fee.gas_price.fract().is_zero() {
        return Err(ChainError::UnsupportedFee(format!(
            "gas price {} is not a whole number of base units per gas",
            fee.gas_price
        )));
    }
    match fee.gas_price.to_u128() {
        Some(price) if price > 0 => Ok(price),
        _ => Err(ChainError::UnsupportedFee(format!(
            "gas price {} must be a positive integer",
            fee.gas_price
        ))),
    }
}

/// Map a transport failure onto the retry classification.
fn classify(err: &TransportError) -> RpcErrorKind {
    match err {
        RpcError::Transport(TransportErrorKind::HttpError(http))
            if http.status == HTTP_TOO_MANY_REQUESTS =>
        {
            RpcErrorKind::RateLimited
        }
        RpcError::ErrorResp(payload) if payload.code == i64::from(HTTP_TOO_MANY_REQUESTS) => {
            RpcErrorKind::RateLimited
        }
        _ => RpcErrorKind::Other,
    }
}
