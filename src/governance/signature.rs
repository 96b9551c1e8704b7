//! EIP-712 vote payload.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::Eip712Domain;
use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::GovernanceConfig;

sol! {
    /// Vote authorization checked by the governance contract.
    #[derive(Debug, PartialEq, Eq)]
    struct CastVoteBySig {
        uint256 verifyingChainId;
        address voter;
        bool yesVote;
        uint256 nonce;
        uint256 deadline;
    }
}

/// Domain: name, version and verifying contract. No chain ID or salt; the
/// chain is carried in the message instead.
pub fn vote_domain(config: &GovernanceConfig, contract: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Owned(config.domain_name.clone())),
        Some(Cow::Owned(config.domain_version.clone())),
        None,
        Some(contract),
        None,
    )
}

/// Message for `voter` expiring at `deadline`.
pub fn vote_message(config: &GovernanceConfig, voter: Address, deadline: u64) -> CastVoteBySig {
    CastVoteBySig {
        verifyingChainId: U256::from(config.verifying_chain_id),
        voter,
        yesVote: config.yes_vote,
        nonce: U256::from(config.signature_nonce),
        deadline: U256::from(deadline),
    }
}

/// Signature deadline measured from now.
pub fn deadline_from_now(config: &GovernanceConfig) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    now.saturating_add(config.deadline_secs)
}
