//! Governance API payloads and vote outcomes.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::BlockchainError;

/// Body of `GET /api/vote/{proposal}/user/{address}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingStatus {
    #[serde(default)]
    pub has_voted: bool,
    #[serde(default)]
    pub voting_power: f64,
}

/// Body of `PUT /api/vote/{contract}/vote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSubmission {
    pub is_yes_vote: bool,
    /// 65-byte signature, 0x-prefixed hex.
    pub signature: String,
    /// Unix seconds after which the signature is invalid.
    pub signature_deadline: u64,
    pub voter: Address,
}

/// Whether an account can vote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Eligibility {
    Eligible { voting_power: f64 },
    AlreadyVoted,
    NoVotingPower,
}

impl Eligibility {
    /// `hasVoted` wins over any reported power.
    pub fn from_status(status: &VotingStatus) -> Self {
        if status.has_voted {
            Eligibility::AlreadyVoted
        } else if status.voting_power > 0.0 {
            Eligibility::Eligible {
                voting_power: status.voting_power,
            }
        } else {
            Eligibility::NoVotingPower
        }
    }

    /// Usable voting power; zero for both ineligible cases.
    pub fn voting_power(&self) -> f64 {
        match self {
            Eligibility::Eligible { voting_power } => *voting_power,
            Eligibility::AlreadyVoted | Eligibility::NoVotingPower => 0.0,
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible { .. })
    }
}

/// Result of a completed vote attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoteOutcome {
    /// The API accepted the signed vote.
    Submitted,
    /// Nothing was signed or sent.
    Skipped(Eligibility),
}

impl VoteOutcome {
    /// Metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteOutcome::Submitted => "submitted",
            VoteOutcome::Skipped(Eligibility::AlreadyVoted) => "already_voted",
            VoteOutcome::Skipped(_) => "no_voting_power",
        }
    }
}

/// Errors from the governance API or vote signing.
#[derive(Debug, Error)]
pub enum GovernanceError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-200 status.
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(String),

    /// Vote could not be signed.
    #[error(transparent)]
    Signing(#[from] BlockchainError),
}
