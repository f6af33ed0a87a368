//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! disburse / resilience / batch
//!     → tracing events tagged [SKIP] [SEND] [OK] [RETRY] [ERR]
//!     → logging.rs (fmt subscriber, stdout)
//! ```

pub mod logging;

pub use logging::init_logging;
