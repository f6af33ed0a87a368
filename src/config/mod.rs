//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SweeperConfig (validated, immutable)
//!     → passed by reference into the batch runner
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a run never mutates it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::SweeperConfig;
pub use schema::{ChainConfig, DenominationConfig, FeeConfig, RetryConfig};
