//! Flat fee derivation and net amount computation.
//!
//! Fees are fixed per transfer: `ceil(gas_price * gas_limit)` in base units,
//! independent of the amount moved.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::FeeConfig;

/// Errors from fee derivation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeError {
    #[error("invalid gas price '{0}'")]
    InvalidGasPrice(String),

    #[error("gas price must be positive, got {0}")]
    NonPositiveGasPrice(Decimal),

    #[error("gas limit must be > 0")]
    ZeroGasLimit,

    #[error("fee {gas_price} x {gas_limit} overflows")]
    Overflow { gas_price: Decimal, gas_limit: u64 },
}

/// Fee parameters for every transfer in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSpec {
    /// Price per unit of gas, in base units.
    pub gas_price: Decimal,
    pub gas_limit: u64,
    /// `ceil(gas_price * gas_limit)`, in base units.
    pub flat_fee: u128,
}

impl FeeSpec {
    pub fn new(gas_price: Decimal, gas_limit: u64) -> Result<Self, FeeError> {
        let flat_fee = compute_flat_fee(gas_price, gas_limit)?;
        Ok(Self {
            gas_price,
            gas_limit,
            flat_fee,
        })
    }

    /// Parse the configured decimal gas price and derive the flat fee.
    pub fn from_config(config: &FeeConfig) -> Result<Self, FeeError> {
        let gas_price: Decimal = config
            .gas_price
            .trim()
            .parse()
            .map_err(|_| FeeError::InvalidGasPrice(config.gas_price.clone()))?;
        Self::new(gas_price, config.gas_limit)
    }
}

/// Net amount available for transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendAmount {
    /// Balance cannot cover the fee plus a positive transfer.
    Insufficient,
    Sendable(u128),
}

/// Derive the flat fee `ceil(gas_price * gas_limit)`.
pub fn compute_flat_fee(gas_price: Decimal, gas_limit: u64) -> Result<u128, FeeError> {
    if gas_limit == 0 {
        return Err(FeeError::ZeroGasLimit);
    }
    if gas_price <= Decimal::ZERO {
        return Err(FeeError::NonPositiveGasPrice(gas_price));
    }

    let overflow = || FeeError::Overflow {
        gas_price,
        gas_limit,
    };
    gas_price
        .checked_mul(Decimal::from(gas_limit))
        .ok_or_else(overflow)?
        .ceil()
        .to_u128()
        .ok_or_else(overflow)
}

/// Amount left after paying the fee; a balance equal to the fee is insufficient.
pub fn compute_send_amount(balance: u128, flat_fee: u128) -> SendAmount {
    if balance <= flat_fee {
        SendAmount::Insufficient
    } else {
        SendAmount::Sendable(balance - flat_fee)
    }
}
