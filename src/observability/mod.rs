//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!     → tracing.rs (run and account spans)
//! ```
//!
//! # Design Decisions
//! - Run ID flows through every account span
//! - Private keys never appear in fields or messages

pub mod logging;
pub mod metrics;
pub mod tracing;
