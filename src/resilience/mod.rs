//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Fallible operation (API call, transaction send):
//!     → retries.rs (run, log failure, pause, try again)
//!     → backoff.rs (fixed or exponential pause)
//!     → exhaustion surfaces as RetryExhausted
//! ```
//!
//! # Design Decisions
//! - Every external call also carries its own timeout at the call site
//! - Exhaustion is a distinct error, never a value that could be a real result

pub mod backoff;
pub mod retries;

pub use backoff::Backoff;
pub use retries::{retry, RetryExhausted, RetryPolicy};
