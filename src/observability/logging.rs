//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Timestamp every line (fmt layer default)
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level when set
//! - Dependencies log at warn so RPC chatter stays out of the sweep output

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directives used when `RUST_LOG` is not set.
pub fn default_directives(log_level: &str) -> String {
    format!("warn,balance_sweeper={}", log_level.trim())
}

/// Install the global subscriber.
pub fn init_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
