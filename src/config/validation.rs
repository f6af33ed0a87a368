//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (gas limit > 0, decimals representable)
//! - Check the fee parameters actually produce a fee
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SweeperConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::SweeperConfig;
use crate::disburse::denom::MAX_DECIMALS;
use crate::disburse::fee::FeeSpec;

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `fee.gas_limit`).
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SweeperConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = url::Url::parse(&config.chain.rpc_url) {
        errors.push(ValidationError::new(
            "chain.rpc_url",
            format!("invalid URL '{}': {}", config.chain.rpc_url, e),
        ));
    }

    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be > 0"));
    }

    if config.denomination.base.trim().is_empty() {
        errors.push(ValidationError::new("denomination.base", "must not be empty"));
    }

    if config.denomination.decimals > MAX_DECIMALS {
        errors.push(ValidationError::new(
            "denomination.decimals",
            format!("must be <= {}", MAX_DECIMALS),
        ));
    }

    // Gas limit errors are reported by FeeSpec as well; keep one message per field.
    if config.fee.gas_limit == 0 {
        errors.push(ValidationError::new("fee.gas_limit", "must be > 0"));
    } else if let Err(e) = FeeSpec::from_config(&config.fee) {
        errors.push(ValidationError::new("fee.gas_price", e.to_string()));
    }

    if config.transfer.recipient.trim().is_empty() {
        errors.push(ValidationError::new("transfer.recipient", "must be set"));
    }

    if config.transfer.explorer_tx_url.trim().is_empty() {
        errors.push(ValidationError::new("transfer.explorer_tx_url", "must not be empty"));
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be >= 1"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
