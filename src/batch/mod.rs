//! Batch subsystem.
//!
//! # Data Flow
//! ```text
//! key file
//!     → keys.rs (ordered AccountKey list)
//!     → runner.rs (per key: retry scheduler, then pacing delay)
//!     → BatchSummary (logged)
//! ```
//!
//! # Design Decisions
//! - Strictly sequential; input order is processing order
//! - No checkpointing: a rerun starts from the top and already drained
//!   accounts fall into the "balance too small" skip

pub mod keys;
pub mod runner;

pub use keys::{load_keys, parse_keys, KeySourceError};
pub use runner::{BatchRunner, BatchSummary};
