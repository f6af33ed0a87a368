//! Per-account disbursement.
//!
//! # Data Flow
//! ```text
//! SweeperConfig
//!     → fee.rs (flat fee, computed once)
//!     → denom.rs (display formatting for log lines)
//!     → procedure.rs (one attempt: balance → skip or send)
//! ```

pub mod denom;
pub mod fee;
pub mod procedure;
pub mod types;

pub use fee::{FeeError, FeeSpec};
pub use procedure::{disburse, DisburseSettings};
pub use types::{AttemptOutcome, SkipReason, TransferPlan};
