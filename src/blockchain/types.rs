//! Chain-agnostic types and error definitions.

use std::fmt;

use thiserror::Error;

/// Secret credential for one funding account.
///
/// The key is never logged; `Debug` prints a redacted placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountKey(String);

impl AccountKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key material, for handing to a signer.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccountKey(<redacted>)")
    }
}

/// Identity derived from an [`AccountKey`] for the duration of one attempt.
#[derive(Debug, Clone)]
pub struct Account {
    pub address: String,
    pub key: AccountKey,
}

/// Balance of one denomination held by an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    /// Amount in base units.
    pub amount: u128,
    pub denom: String,
}

/// Transaction identifier returned by a successful broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification of an RPC failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorKind {
    /// Endpoint throttled the request (HTTP 429).
    RateLimited,
    Other,
}

impl fmt::Display for RpcErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcErrorKind::RateLimited => f.write_str("rate limited"),
            RpcErrorKind::Other => f.write_str("failed"),
        }
    }
}

/// Errors that can occur during chain operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// Invalid private key format or derivation error.
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// Address could not be parsed for this chain.
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Could not establish a session with the RPC endpoint.
    #[error("Connection error: {message}")]
    Connection { message: String, rate_limited: bool },

    /// RPC request failed after the session was established.
    #[error("RPC request {kind}: {message}")]
    Rpc { kind: RpcErrorKind, message: String },

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Fee parameters the chain cannot express on a transfer.
    #[error("Unsupported fee: {0}")]
    UnsupportedFee(String),

    /// The chain refused the signed transaction.
    #[error("Broadcast rejected: {0}")]
    BroadcastRejected(String),
}

impl ChainError {
    /// Build an RPC error with the given classification.
    pub fn rpc(kind: RpcErrorKind, message: impl Into<String>) -> Self {
        Self::Rpc {
            kind,
            message: message.into(),
        }
    }

    /// Whether the endpoint throttled the request.
    ///
    /// This is the only transient class; everything else is fatal for the account.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            ChainError::Rpc { kind, .. } => *kind == RpcErrorKind::RateLimited,
            ChainError::Connection { rate_limited, .. } => *rate_limited,
            _ => false,
        }
    }
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
