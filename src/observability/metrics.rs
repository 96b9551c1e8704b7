//! Metrics collection.
//!
//! # Metrics
//! - `voter_votes_total` (counter): vote outcomes by `outcome` label
//! - `voter_transactions_total` (counter): mined transactions by `status`
//! - `voter_retries_total` (counter): failed attempts by `operation`
//!
//! No exporter is installed; a recorder can be attached by an embedding
//! process. Without one these calls are no-ops.

use metrics::counter;

/// Record the final outcome of one account's vote.
pub fn record_vote(outcome: &'static str) {
    counter!("voter_votes_total", "outcome" => outcome).increment(1);
}

/// Record a mined transaction.
pub fn record_transaction(success: bool) {
    let status = if success { "confirmed" } else { "reverted" };
    counter!("voter_transactions_total", "status" => status).increment(1);
}

/// Record a failed attempt inside the retry wrapper.
pub fn record_retry(operation: &str) {
    counter!("voter_retries_total", "operation" => operation.to_string()).increment(1);
}
