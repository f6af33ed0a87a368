//! Per-attempt disbursement types.

use std::fmt;

use crate::blockchain::types::{ChainError, TxHash};
use crate::disburse::fee::FeeSpec;

/// A transfer that spends an account's balance minus the flat fee.
///
/// Only built when the balance strictly exceeds the fee, so
/// `send_amount + fee.flat_fee <= balance` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub from: String,
    pub to: String,
    /// Amount moved, in base units.
    pub send_amount: u128,
    pub fee: FeeSpec,
}

/// Why an account was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Balance does not exceed the flat fee.
    BalanceTooSmall,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BalanceTooSmall => f.write_str("balance too small"),
        }
    }
}

/// Result of processing one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Skipped(SkipReason),
    Sent(TxHash),
    Failed(ChainError),
}

impl AttemptOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, AttemptOutcome::Sent(_))
    }
}
