//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → section structs handed to each subsystem's constructor
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no process-wide globals
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;
pub use schema::{
    AccountsConfig, BlockchainConfig, GovernanceConfig, ObservabilityConfig, RetryConfig,
    SessionConfig,
};
