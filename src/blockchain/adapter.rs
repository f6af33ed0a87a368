//! Chain client abstraction.
//!
//! The disbursement procedure only talks to the chain through these traits,
//! so any chain with a key → address derivation, a balance query and a
//! signed transfer can be swept.
//!
//! ## Contract
//!
//! - Implementations MUST NOT retry internally; retry policy lives in
//!   [`crate::resilience::retries`].
//! - Implementations MUST report throttling through
//!   [`ChainError::is_rate_limited`](crate::blockchain::ChainError::is_rate_limited),
//!   never only in the message text.
//! - Implementations own per-call timeouts.

use async_trait::async_trait;

use crate::blockchain::types::{Account, AccountKey, Balance, ChainResult, TxHash};
use crate::disburse::fee::FeeSpec;
use crate::disburse::types::TransferPlan;

/// Entry point of a chain client.
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    /// Session type opened per attempt.
    type Session: ChainSession;

    /// Derive the account address for a private key.
    ///
    /// Fails with [`ChainError::InvalidKey`](crate::blockchain::ChainError::InvalidKey)
    /// on malformed input.
    fn derive_identity(&self, key: &AccountKey) -> ChainResult<Account>;

    /// Check that an address is well-formed for this chain.
    fn validate_address(&self, _address: &str) -> ChainResult<()> {
        Ok(())
    }

    /// Check that this chain can charge exactly `fee` on a transfer.
    fn validate_fee(&self, _fee: &FeeSpec) -> ChainResult<()> {
        Ok(())
    }

    /// Open a signing session for `account`.
    async fn connect(&self, account: &Account) -> ChainResult<Self::Session>;
}

/// A signer session scoped to one disbursement attempt.
#[async_trait]
pub trait ChainSession: Send + Sync {
    /// Query the balance of `address` in `denom`.
    async fn get_balance(&self, address: &str, denom: &str) -> ChainResult<Balance>;

    /// Sign and broadcast a transfer, attaching the plan's fee and gas limit.
    async fn send_tokens(&self, plan: &TransferPlan) -> ChainResult<TxHash>;

    /// Release the session. Callers log and swallow failures.
    async fn disconnect(self) -> ChainResult<()>;
}
