//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! AccountKey (from the key file)
//!     → adapter.rs (ChainAdapter: derive identity, connect)
//!     → ChainSession (balance query, transfer, disconnect)
//!     → client.rs (EVM JSON-RPC via alloy) | mock.rs (in-memory)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from the key file
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod adapter;
pub mod client;
pub mod mock;
pub mod types;
pub mod wallet;

pub use adapter::{ChainAdapter, ChainSession};
pub use client::EvmChainClient;
pub use mock::{MockChainClient, MockEvent, MockOp};
pub use types::{Account, AccountKey, Balance, ChainError, ChainResult, RpcErrorKind, TxHash};
pub use wallet::Wallet;
