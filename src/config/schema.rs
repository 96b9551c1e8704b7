//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the voter.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the governance voter.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Node connection and transaction settings.
    pub blockchain: BlockchainConfig,

    /// Governance API and vote payload settings.
    pub governance: GovernanceConfig,

    /// Retry policy for API calls and account operations.
    pub retries: RetryConfig,

    /// Pacing between accounts.
    pub session: SessionConfig,

    /// Key and proxy file locations.
    pub accounts: AccountsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Expected chain ID. `None` skips the startup check.
    pub chain_id: Option<u64>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a transaction to be mined.
    pub tx_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub receipt_poll_ms: u64,

    /// Number of block confirmations required after inclusion.
    pub confirmation_blocks: u32,

    /// Use EIP-1559 fee fields instead of a legacy gas price.
    pub eip1559: bool,

    /// Blocks of fee history averaged for EIP-1559 pricing.
    pub fee_history_blocks: u64,

    /// Reward percentiles requested with the fee history.
    pub reward_percentiles: Vec<f64>,

    /// Multiplier applied to the average priority fee when deriving max fee.
    pub gas_price_multiplier: f64,

    /// Safety margin applied to estimated gas (1.2 = 20% buffer).
    pub gas_limit_multiplier: f64,

    /// Gas price ceiling in gwei used by the gas waiter.
    pub max_gas_price_gwei: u64,

    /// Attempts for a full build/sign/send/confirm cycle.
    pub tx_retries: u32,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.reya.network".to_string(),
            failover_urls: Vec::new(),
            chain_id: None,
            rpc_timeout_secs: 10,
            tx_timeout_secs: 360,
            receipt_poll_ms: 2000,
            confirmation_blocks: 0,
            eip1559: true,
            fee_history_blocks: 5,
            reward_percentiles: vec![10.0, 20.0, 30.0],
            gas_price_multiplier: 1.2,
            gas_limit_multiplier: 1.2,
            max_gas_price_gwei: 50,
            tx_retries: 3,
        }
    }
}

/// Governance API and typed-data settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GovernanceConfig {
    /// Base URL of the governance API (with or without trailing slash).
    pub api_base_url: String,

    /// Address of the governance contract the vote is cast on.
    pub vote_contract: String,

    /// Proposal segment of the voting-power endpoint.
    pub proposal: String,

    /// EIP-712 domain name.
    pub domain_name: String,

    /// EIP-712 domain version.
    pub domain_version: String,

    /// Chain ID embedded in the vote message.
    pub verifying_chain_id: u64,

    /// Signature nonce embedded in the vote message.
    pub signature_nonce: u64,

    /// Seconds from now until the signature expires.
    pub deadline_secs: u64,

    /// Vote direction.
    pub yes_vote: bool,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Origin header sent with API requests.
    pub origin: String,

    /// User-Agent header sent with API requests.
    pub user_agent: String,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.reya.xyz/".to_string(),
            vote_contract: String::new(),
            proposal: "rnip2".to_string(),
            domain_name: "Reya".to_string(),
            domain_version: "1".to_string(),
            verifying_chain_id: 1729,
            signature_nonce: 1,
            deadline_secs: 7 * 24 * 60 * 60,
            yes_vote: true,
            request_timeout_secs: 30,
            origin: "https://app.reya.network".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per operation.
    pub max_attempts: u32,

    /// Fixed pause between attempts in milliseconds.
    pub delay_ms: u64,

    /// Switch to exponential backoff with jitter.
    pub exponential: bool,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 10_000,
            exponential: false,
            max_delay_ms: 60_000,
        }
    }
}

/// Pacing between accounts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Lower bound of the random pause in seconds.
    pub delay_min_secs: u64,

    /// Upper bound of the random pause in seconds.
    pub delay_max_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            delay_min_secs: 30,
            delay_max_secs: 90,
        }
    }
}

/// Input file locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccountsConfig {
    /// File with one private key per line (optionally `key:proxy`).
    pub keys_path: String,

    /// Optional file with one proxy per line, matched to keys by position.
    pub proxies_path: String,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            keys_path: "data/private_keys.txt".to_string(),
            proxies_path: "data/proxies.txt".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable output.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.blockchain.eip1559);
        assert_eq!(config.blockchain.fee_history_blocks, 5);
        assert_eq!(config.governance.deadline_secs, 604_800);
        assert_eq!(config.governance.verifying_chain_id, 1729);
        assert_eq!(config.retries.max_attempts, 3);
        assert_eq!(config.retries.delay_ms, 10_000);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [blockchain]
            rpc_url = "http://localhost:8545"
            eip1559 = false

            [session]
            delay_min_secs = 5
            delay_max_secs = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.blockchain.rpc_url, "http://localhost:8545");
        assert!(!config.blockchain.eip1559);
        assert_eq!(config.blockchain.tx_retries, 3);
        assert_eq!(config.session.delay_max_secs, 10);
        assert_eq!(config.governance.domain_name, "Reya");
    }
}
