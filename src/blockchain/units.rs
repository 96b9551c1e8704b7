//! Conversion between human-readable token amounts and base units.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// `"1.5"` with 6 decimals → `1_500_000`.
pub fn to_base_units(amount: &str, decimals: u8) -> BlockchainResult<U256> {
    let parsed = parse_units(amount, decimals)
        .map_err(|e| BlockchainError::Units(format!("'{}' ({} decimals): {}", amount, decimals, e)))?;
    if parsed.is_negative() {
        return Err(BlockchainError::Units(format!("negative amount '{}'", amount)));
    }
    Ok(parsed.get_absolute())
}

/// `1_500_000` with 6 decimals → `"1.500000"`.
pub fn from_base_units(raw: U256, decimals: u8) -> BlockchainResult<String> {
    format_units(raw, decimals).map_err(|e| BlockchainError::Units(e.to_string()))
}

/// Gas price in wei → gwei, rounded down.
pub fn wei_to_gwei(wei: u128) -> u128 {
    wei / 1_000_000_000
}
