//! Per-account vote flow.
//!
//! ```text
//! CHECK_ELIGIBILITY ──ineligible──▶ done (nothing signed, nothing sent)
//!        │
//!     eligible
//!        ▼
//! SIGN_AND_SUBMIT ──▶ done
//! ```

use alloy::primitives::Address;

use crate::blockchain::AccountClient;
use crate::config::GovernanceConfig;
use crate::governance::api::GovernanceApi;
use crate::governance::signature::{deadline_from_now, vote_domain, vote_message};
use crate::governance::types::{Eligibility, GovernanceError, VoteOutcome, VoteSubmission};
use crate::resilience::{retry, RetryExhausted, RetryPolicy};

/// Casts one account's vote through a governance API.
pub struct VoteRunner<A> {
    account: AccountClient,
    api: A,
    config: GovernanceConfig,
    contract: Address,
    retry: RetryPolicy,
}

impl<A: GovernanceApi> VoteRunner<A> {
    pub fn new(
        account: AccountClient,
        api: A,
        config: GovernanceConfig,
        contract: Address,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            account,
            api,
            config,
            contract,
            retry,
        }
    }

    pub fn address(&self) -> Address {
        self.account.address()
    }

    /// One eligibility lookup, no retry.
    pub async fn check_voting_power(&self) -> Result<Eligibility, GovernanceError> {
        let address = self.address();
        let status = self.api.voting_status(address).await?;
        let eligibility = Eligibility::from_status(&status);

        match eligibility {
            Eligibility::Eligible { voting_power } => {
                tracing::info!(address = %address, voting_power, "Account has voting power");
            }
            Eligibility::AlreadyVoted => {
                tracing::info!(address = %address, "Account has already voted");
            }
            Eligibility::NoVotingPower => {
                tracing::debug!(address = %address, "Account has no voting power");
            }
        }
        Ok(eligibility)
    }

    /// Check eligibility, then sign and submit if eligible.
    ///
    /// Every "casting vote" attempt checks eligibility again before it
    /// submits, so a vote the server recorded despite an error response is
    /// seen as already cast and not sent twice. The eligibility check has its
    /// own retry; exhausting it ends the vote at once as an error, not a skip.
    pub async fn cast_vote(&self) -> Result<VoteOutcome, RetryExhausted> {
        retry("casting vote", &self.retry, || self.attempt_vote()).await?
    }

    /// One "casting vote" attempt. The outer error is retried; the inner one
    /// is final.
    async fn attempt_vote(&self) -> Result<Result<VoteOutcome, RetryExhausted>, GovernanceError> {
        let eligibility =
            match retry("getting vote power", &self.retry, || self.check_voting_power()).await {
                Ok(eligibility) => eligibility,
                Err(exhausted) => return Ok(Err(exhausted)),
            };

        if !eligibility.is_eligible() {
            tracing::warn!(
                address = %self.address(),
                "Account has already voted or has no voting power"
            );
            return Ok(Ok(VoteOutcome::Skipped(eligibility)));
        }

        self.sign_and_submit().await?;
        tracing::info!(address = %self.address(), "Voted successfully");
        Ok(Ok(VoteOutcome::Submitted))
    }

    async fn sign_and_submit(&self) -> Result<(), GovernanceError> {
        let voter = self.address();
        let deadline = deadline_from_now(&self.config);
        let domain = vote_domain(&self.config, self.contract);
        let message = vote_message(&self.config, voter, deadline);

        let signature = self.account.sign_typed_data(&message, &domain).await?;

        let submission = VoteSubmission {
            is_yes_vote: self.config.yes_vote,
            signature: alloy::hex::encode_prefixed(signature.as_bytes()),
            signature_deadline: deadline,
            voter,
        };
        self.api.submit_vote(self.contract, &submission).await
    }
}
