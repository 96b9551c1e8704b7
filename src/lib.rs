//! Governance vote runner for EVM accounts.

pub mod blockchain;
pub mod config;
pub mod governance;
pub mod observability;
pub mod resilience;
pub mod session;

pub use config::schema::AppConfig;
pub use governance::VoteRunner;
pub use session::{SessionReport, VoteSession};
