//! Batch balance sweeper library.

pub mod batch;
pub mod blockchain;
pub mod config;
pub mod disburse;
pub mod observability;
pub mod resilience;

pub use batch::{BatchRunner, BatchSummary};
pub use config::schema::SweeperConfig;
pub use disburse::{AttemptOutcome, DisburseSettings};
