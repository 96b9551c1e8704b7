//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! private key (accounts file)
//!     → wallet.rs (key parsing, message / typed-data / tx signing)
//!     → client.rs (RPC connection with timeouts, failover, optional proxy)
//!     → gas.rs (fee derivation from fee history)
//!     → transaction.rs (build, sign, broadcast, confirm)
//!     → account.rs (retrying writes, balances, approvals)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Nonces are always read from the node; sends from one account must not overlap

pub mod account;
pub mod client;
pub mod gas;
pub mod transaction;
pub mod types;
pub mod units;
pub mod wallet;

pub use account::AccountClient;
pub use client::BlockchainClient;
pub use types::{
    ApprovalOutcome, BlockchainConfig, BlockchainError, BlockchainResult, ChainId,
    ConfirmationStatus, GasParams, TokenBalance, TxCall,
};
pub use wallet::Wallet;
