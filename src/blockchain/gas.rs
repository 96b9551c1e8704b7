//! Gas price derivation.
//!
//! EIP-1559 pricing averages the base fee over the fee-history window and the
//! priority fee over every (block, percentile) bucket, then sets
//!
//! ```text
//! max_priority_fee = avg_priority
//! max_fee          = avg_base + avg_priority × multiplier
//! ```
//!
//! There is no smoothing beyond the window, so short fee spikes pass through.

use crate::blockchain::types::{BlockchainError, BlockchainResult, GasParams};

/// Derive fee-market parameters from a fee-history response.
///
/// `rewards` holds one row per block, one column per requested percentile.
pub fn fee_market_params(
    base_fees: &[u128],
    rewards: &[Vec<u128>],
    multiplier: f64,
) -> BlockchainResult<GasParams> {
    if base_fees.is_empty() {
        return Err(BlockchainError::FeeHistory("no base fees".to_string()));
    }
    if rewards.is_empty() || rewards.iter().any(|row| row.is_empty()) {
        return Err(BlockchainError::FeeHistory("no priority fee rewards".to_string()));
    }

    let avg_base = mean(base_fees.iter().map(|fee| *fee as f64));
    let avg_priority = mean(rewards.iter().map(|row| mean(row.iter().map(|fee| *fee as f64))));

    Ok(GasParams::FeeMarket {
        max_fee_per_gas: (avg_base + avg_priority * multiplier) as u128,
        max_priority_fee_per_gas: avg_priority as u128,
    })
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let len = values.len();
    values.sum::<f64>() / len as f64
}

/// Whether a legacy gas price is under a gwei ceiling.
pub fn below_ceiling(gas_price_wei: u128, max_gwei: u64) -> bool {
    gas_price_wei < max_gwei as u128 * 1_000_000_000
}
