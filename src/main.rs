//! governance-voter
//!
//! Casts a signed governance vote for every configured account.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.toml ──▶ config ──┐
//!                            │
//!   private_keys.txt ─┐      ▼
//!   proxies.txt ──────┴─▶ session ──▶ governance::VoteRunner ──▶ governance API (HTTP)
//!                            │                │
//!                            │                ▼
//!                            │        blockchain::AccountClient ──▶ EVM node (JSON-RPC)
//!                            ▼
//!                   observability (tracing, metrics)   resilience (retry)
//! ```

use alloy::primitives::Address;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use governance_voter::blockchain::{units, ApprovalOutcome};
use governance_voter::config::{load_config, AppConfig};
use governance_voter::observability::logging;
use governance_voter::session::{self, load_accounts, AccountEntry, TokioPause, VoteSession};

#[derive(Parser)]
#[command(name = "governance-voter")]
#[command(about = "Cast signed governance votes for a list of EVM accounts", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Vote with every account
    Vote,
    /// Show native (and optionally token) balances
    Balances {
        /// ERC-20 token address
        #[arg(long)]
        token: Option<String>,
    },
    /// Approve a spender for an ERC-20 token from every account
    Approve {
        #[arg(long)]
        token: String,
        #[arg(long)]
        spender: String,
        /// Amount in token units, e.g. 12.5
        #[arg(long)]
        amount: String,
        /// Approve U256::MAX instead of the exact amount
        #[arg(long)]
        max: bool,
        /// Wait until gas drops below this many gwei
        #[arg(long)]
        max_gwei: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    logging::init(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "governance-voter starting");

    let accounts = load_accounts(
        Path::new(&config.accounts.keys_path),
        Path::new(&config.accounts.proxies_path),
    )
    .context("loading accounts")?;

    match cli.command {
        Commands::Vote => vote(config, &accounts).await,
        Commands::Balances { token } => balances(&config, &accounts, token.as_deref()).await,
        Commands::Approve {
            token,
            spender,
            amount,
            max,
            max_gwei,
        } => {
            let token: Address = token.parse().context("invalid --token address")?;
            let spender: Address = spender.parse().context("invalid --spender address")?;
            let max_gwei = max_gwei.unwrap_or(config.blockchain.max_gas_price_gwei);

            for entry in &accounts {
                let account = match session::open_account(&config, entry).await {
                    Ok(account) => account,
                    Err(e) => {
                        tracing::error!(error = %e, "Skipping account");
                        continue;
                    }
                };
                account.wait_for_gas(max_gwei).await;
                match account.approve(token, spender, &amount, max).await {
                    Ok(ApprovalOutcome::Approved(tx_hash)) => {
                        tracing::info!(address = %account.address(), tx_hash = %tx_hash, "Approved")
                    }
                    Ok(ApprovalOutcome::NotNeeded) => {}
                    Err(e) => tracing::error!(address = %account.address(), error = %e, "Approve failed"),
                }
            }
            Ok(())
        }
    }
}

async fn vote(config: AppConfig, accounts: &[AccountEntry]) -> anyhow::Result<()> {
    let session = VoteSession::new(config, TokioPause).context("building vote session")?;
    let report = session.run(accounts).await;

    println!(
        "{} accounts: {} voted, {} skipped, {} failed",
        report.total(),
        report.submitted,
        report.skipped,
        report.failed
    );
    Ok(())
}

async fn balances(config: &AppConfig, accounts: &[AccountEntry], token: Option<&str>) -> anyhow::Result<()> {
    let token = token
        .map(|t| t.parse::<Address>())
        .transpose()
        .context("invalid --token address")?;

    for entry in accounts {
        let account = match session::open_account(config, entry).await {
            Ok(account) => account,
            Err(e) => {
                tracing::error!(error = %e, "Skipping account");
                continue;
            }
        };

        let native = match account.native_balance().await {
            Ok(wei) => units::from_base_units(wei, 18)?,
            Err(e) => {
                tracing::error!(address = %account.address(), error = %e, "Balance lookup failed");
                continue;
            }
        };

        match token {
            Some(token) => match account.erc20_balance(token).await {
                Ok(balance) => println!("{}  native {}  token {}", account.address(), native, balance.formatted()),
                Err(e) => {
                    tracing::error!(address = %account.address(), error = %e, "Token balance lookup failed");
                    println!("{}  native {}", account.address(), native);
                }
            },
            None => println!("{}  native {}", account.address(), native),
        }
    }
    Ok(())
}
