//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Account attempt:
//!     → retries.rs (run attempt, classify failure)
//!     → On rate limit: backoff.rs (next delay), sleep, attempt again
//! ```
//!
//! # Design Decisions
//! - Only throttling is transient; every other failure is final for the account
//! - Per-call timeouts belong to the chain adapter, not this layer

pub mod backoff;
pub mod retries;

pub use retries::{run_with_retry, RetryPolicy, RetryReport};
