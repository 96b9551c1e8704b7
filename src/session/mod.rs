//! Sequential driver over all accounts.
//!
//! # Data Flow
//! ```text
//! accounts.rs (keys + proxies)
//!     → VoteSession::run
//!         → per account: Wallet + BlockchainClient + HttpGovernanceApi
//!         → governance::VoteRunner::cast_vote
//!         → pacing.rs (pause after a submitted vote, except the last)
//!     → SessionReport
//! ```

pub mod accounts;
pub mod pacing;

use alloy::primitives::Address;
use thiserror::Error;
use tracing::Instrument;

use crate::blockchain::{AccountClient, BlockchainClient, BlockchainError, Wallet};
use crate::config::AppConfig;
use crate::governance::{GovernanceError, HttpGovernanceApi, VoteOutcome, VoteRunner};
use crate::observability::{metrics, tracing as spans};
use crate::resilience::{RetryExhausted, RetryPolicy};

pub use accounts::{load_accounts, AccountEntry, AccountsError};
pub use pacing::{random_delay, Pause, TokioPause};

/// Why one account could not be processed.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid vote contract '{0}'")]
    InvalidContract(String),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error(transparent)]
    Retry(#[from] RetryExhausted),
}

/// Tally of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub submitted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub pauses: usize,
}

impl SessionReport {
    pub fn total(&self) -> usize {
        self.submitted + self.skipped + self.failed
    }
}

/// Account client for one entry, routed through its proxy.
pub async fn open_account(config: &AppConfig, entry: &AccountEntry) -> Result<AccountClient, SessionError> {
    let wallet = Wallet::from_private_key(entry.private_key())?;
    let client = BlockchainClient::new(config.blockchain.clone(), entry.proxy()).await?;
    Ok(AccountClient::new(client, wallet, RetryPolicy::from(&config.retries)))
}

/// Votes with every account, one at a time.
pub struct VoteSession<P> {
    config: AppConfig,
    contract: Address,
    pause: P,
}

impl<P: Pause> VoteSession<P> {
    pub fn new(config: AppConfig, pause: P) -> Result<Self, SessionError> {
        let contract = config
            .governance
            .vote_contract
            .trim()
            .parse()
            .map_err(|_| SessionError::InvalidContract(config.governance.vote_contract.clone()))?;
        Ok(Self {
            config,
            contract,
            pause,
        })
    }

    /// Process every account in order. Failures are counted, never fatal.
    pub async fn run(&self, accounts: &[AccountEntry]) -> SessionReport {
        let span = spans::run_span(accounts.len());
        self.run_inner(accounts).instrument(span).await
    }

    async fn run_inner(&self, accounts: &[AccountEntry]) -> SessionReport {
        let total = accounts.len();
        let mut report = SessionReport::default();
        tracing::info!(accounts = total, contract = %self.contract, "Starting vote run");

        for (index, entry) in accounts.iter().enumerate() {
            let outcome = match Wallet::from_private_key(entry.private_key()) {
                Ok(wallet) => {
                    let span = spans::account_span(index, total, wallet.address());
                    self.vote(wallet, entry).instrument(span).await
                }
                Err(e) => Err(SessionError::from(e)),
            };

            let submitted = match outcome {
                Ok(outcome) => {
                    metrics::record_vote(outcome.as_str());
                    match outcome {
                        VoteOutcome::Submitted => {
                            report.submitted += 1;
                            true
                        }
                        VoteOutcome::Skipped(_) => {
                            report.skipped += 1;
                            false
                        }
                    }
                }
                Err(e) => {
                    metrics::record_vote("failed");
                    tracing::error!(account = index + 1, error = %e, "Account failed");
                    report.failed += 1;
                    false
                }
            };

            if submitted && index + 1 < total {
                let delay = random_delay(
                    self.config.session.delay_min_secs,
                    self.config.session.delay_max_secs,
                );
                self.pause.pause(delay).await;
                report.pauses += 1;
            }
        }

        tracing::info!(
            submitted = report.submitted,
            skipped = report.skipped,
            failed = report.failed,
            "Vote run finished"
        );
        report
    }

    async fn vote(&self, wallet: Wallet, entry: &AccountEntry) -> Result<VoteOutcome, SessionError> {
        let retry = RetryPolicy::from(&self.config.retries);
        let client = BlockchainClient::new(self.config.blockchain.clone(), entry.proxy()).await?;
        let account = AccountClient::new(client, wallet, retry);
        let api = HttpGovernanceApi::new(&self.config.governance, entry.proxy())?;

        let runner = VoteRunner::new(
            account,
            api,
            self.config.governance.clone(),
            self.contract,
            retry,
        );
        Ok(runner.cast_vote().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_contract() {
        let mut config = AppConfig::default();
        config.governance.vote_contract = "0x1234".to_string();
        assert!(matches!(
            VoteSession::new(config, TokioPause),
            Err(SessionError::InvalidContract(_))
        ));
    }

    #[test]
    fn test_vote_requires_contract() {
        // Config validation lets an empty contract through for the other commands
        assert!(crate::config::validation::validate_config(&AppConfig::default()).is_ok());
        assert!(matches!(
            VoteSession::new(AppConfig::default(), TokioPause),
            Err(SessionError::InvalidContract(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_key_counts_as_failure() {
        let mut config = AppConfig::default();
        config.governance.vote_contract = format!("{}", Address::repeat_byte(0x11));
        let session = VoteSession::new(config, TokioPause).unwrap();

        let report = session
            .run(&[AccountEntry::new("not-a-key", None)])
            .await;
        assert_eq!(
            report,
            SessionReport {
                failed: 1,
                ..SessionReport::default()
            }
        );
    }

    #[test]
    fn test_report_total() {
        let report = SessionReport {
            submitted: 2,
            skipped: 3,
            failed: 1,
            pauses: 1,
        };
        assert_eq!(report.total(), 6);
    }
}
