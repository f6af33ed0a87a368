//! Signer derivation from account keys.
//!
//! # Security
//! - Keys arrive only as [`AccountKey`] values read from the key file
//! - Keys are never logged or serialized
//! - A wallet lives for a single attempt and is dropped afterwards

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{AccountKey, ChainError, ChainResult};

/// Signing identity for one EVM account.
#[derive(Debug, Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key.
    ///
    /// The key may carry a `0x` prefix and surrounding whitespace.
    pub fn from_private_key(key: &AccountKey) -> ChainResult<Self> {
        let raw = key.expose_secret().trim();
        let key_hex = raw.strip_prefix("0x").unwrap_or(raw);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ChainError::InvalidKey(format!("Invalid private key format: {}", e)))?;

        tracing::debug!(address = %signer.address(), "Wallet derived");

        Ok(Self { signer })
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Wrap the signer for use as a provider's transaction signer.
    pub fn into_network_wallet(self) -> EthereumWallet {
        EthereumWallet::from(self.signer)
    }
}
