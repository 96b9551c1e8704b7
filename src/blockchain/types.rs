//! Chain-specific types and error definitions.

use alloy::primitives::{utils::format_units, Address, Bytes, TxHash, U256};
use thiserror::Error;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Transaction was not mined within expected time.
    #[error("Transaction {tx_hash} not mined after {secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, secs: u64 },

    /// Transaction was mined but reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(TxHash),

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Transaction could not be assembled or signed.
    #[error("Transaction build error: {0}")]
    Build(String),

    /// Contract return data could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Amount could not be converted between human and base units.
    #[error("Unit conversion error: {0}")]
    Units(String),

    /// Fee history was empty or malformed.
    #[error("Fee history unusable: {0}")]
    FeeHistory(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Gas pricing fields merged into a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasParams {
    /// Pre-London single gas price.
    Legacy { gas_price: u128 },
    /// EIP-1559 fee pair.
    FeeMarket {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
}

/// A call to send: target, calldata and attached native value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxCall {
    pub to: Address,
    pub input: Bytes,
    pub value: U256,
}

impl TxCall {
    /// Contract call without native value.
    pub fn contract(to: Address, input: impl Into<Bytes>) -> Self {
        Self {
            to,
            input: input.into(),
            value: U256::ZERO,
        }
    }

    /// Plain native transfer.
    pub fn transfer(to: Address, value: U256) -> Self {
        Self {
            to,
            input: Bytes::new(),
            value,
        }
    }
}

/// Outcome of waiting for a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Mined with status 1 and enough confirmations.
    Confirmed { block_number: u64 },
    /// Mined with status 0.
    Reverted { block_number: u64 },
}

/// Result of an allowance check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// Existing allowance already covers the amount.
    NotNeeded,
    /// An approval transaction was mined.
    Approved(TxHash),
}

/// ERC-20 balance in base units plus the token's decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBalance {
    pub raw: U256,
    pub decimals: u8,
}

impl TokenBalance {
    /// Human-readable amount, e.g. `"1.500000"` for 1.5 USDC.
    pub fn formatted(&self) -> String {
        format_units(self.raw, self.decimals).unwrap_or_else(|_| self.raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(1u64);
        assert_eq!(chain_id.0, 1);
        assert_eq!(u64::from(chain_id), 1);
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::ChainMismatch {
            expected: 1729,
            actual: 1,
        };
        assert_eq!(err.to_string(), "Chain ID mismatch: expected 1729, got 1");

        let err = BlockchainError::ConfirmationTimeout {
            tx_hash: TxHash::ZERO,
            secs: 360,
        };
        assert!(err.to_string().contains("360 seconds"));
    }

    #[test]
    fn test_token_balance_formatting() {
        let balance = TokenBalance {
            raw: U256::from(1_500_000u64),
            decimals: 6,
        };
        assert_eq!(balance.formatted(), "1.500000");
    }

    #[test]
    fn test_tx_call_constructors() {
        let call = TxCall::transfer(Address::ZERO, U256::from(5));
        assert!(call.input.is_empty());
        assert_eq!(call.value, U256::from(5));

        let call = TxCall::contract(Address::ZERO, vec![1u8, 2, 3]);
        assert_eq!(call.value, U256::ZERO);
        assert_eq!(call.input.len(), 3);
    }
}
