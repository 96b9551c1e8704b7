//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and URLs before any account is touched
//! - Validate value ranges (attempts > 0, multipliers positive, delay bounds ordered)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use alloy::primitives::Address;

use crate::config::schema::AppConfig;

/// One year. Longer-lived vote signatures are almost certainly a typo.
const MAX_DEADLINE_SECS: u64 = 365 * 24 * 60 * 60;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.blockchain.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("invalid URL '{}'", config.blockchain.rpc_url),
        ));
    }
    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }
    if config.blockchain.tx_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.tx_timeout_secs", "must be > 0"));
    }
    if config.blockchain.tx_retries == 0 {
        errors.push(ValidationError::new("blockchain.tx_retries", "must be > 0"));
    }
    if config.blockchain.fee_history_blocks == 0 {
        errors.push(ValidationError::new("blockchain.fee_history_blocks", "must be > 0"));
    }
    if config.blockchain.eip1559 && config.blockchain.reward_percentiles.is_empty() {
        errors.push(ValidationError::new(
            "blockchain.reward_percentiles",
            "at least one percentile is required in EIP-1559 mode",
        ));
    }
    if config.blockchain.gas_price_multiplier <= 0.0 {
        errors.push(ValidationError::new("blockchain.gas_price_multiplier", "must be positive"));
    }
    if config.blockchain.gas_limit_multiplier < 1.0 {
        errors.push(ValidationError::new("blockchain.gas_limit_multiplier", "must be >= 1.0"));
    }

    if config.governance.api_base_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::new(
            "governance.api_base_url",
            format!("invalid URL '{}'", config.governance.api_base_url),
        ));
    }
    // Empty is allowed here: only `vote` needs a contract, and the session
    // rejects a missing one when it is built.
    let contract = config.governance.vote_contract.trim();
    if !contract.is_empty() && contract.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "governance.vote_contract",
            format!("invalid address '{}'", config.governance.vote_contract),
        ));
    }

    if config.governance.deadline_secs == 0 || config.governance.deadline_secs > MAX_DEADLINE_SECS {
        errors.push(ValidationError::new(
            "governance.deadline_secs",
            format!("must be between 1 and {}", MAX_DEADLINE_SECS),
        ));
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be > 0"));
    }

    if config.session.delay_min_secs > config.session.delay_max_secs {
        errors.push(ValidationError::new(
            "session.delay_min_secs",
            format!(
                "{} is greater than delay_max_secs {}",
                config.session.delay_min_secs, config.session.delay_max_secs
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
