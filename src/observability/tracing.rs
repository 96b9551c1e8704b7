//! Spans that tie log lines to a run and to an account.

use alloy::primitives::Address;
use tracing::Span;
use uuid::Uuid;

/// Span covering one pass over all accounts.
pub fn run_span(accounts: usize) -> Span {
    tracing::info_span!("vote_run", run_id = %Uuid::new_v4(), accounts)
}

/// Span covering one account. Index is 1-based for humans.
pub fn account_span(index: usize, total: usize, address: Address) -> Span {
    tracing::info_span!("account", n = index + 1, of = total, address = %address)
}
