//! Transaction building, signing, and confirmation monitoring.
//!
//! # Responsibilities
//! - Build transactions with gas estimation, fresh nonce and fee parameters
//! - Sign and broadcast transactions
//! - Wait for the receipt and report success or revert

use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::TxHash;
use alloy::rpc::types::TransactionRequest;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::gas;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ConfirmationStatus, GasParams, TxCall,
};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// Transaction builder for one account.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    client: BlockchainClient,
    wallet: Wallet,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(client: BlockchainClient, wallet: Wallet) -> Self {
        Self { client, wallet }
    }

    /// Current fee parameters for the configured pricing mode.
    pub async fn gas_params(&self) -> BlockchainResult<GasParams> {
        let config = self.client.config();

        if !config.eip1559 {
            let gas_price = self.client.get_gas_price().await?;
            return Ok(GasParams::Legacy { gas_price });
        }

        let history = self
            .client
            .get_fee_history(config.fee_history_blocks, &config.reward_percentiles)
            .await?;
        let rewards = history.reward.unwrap_or_default();

        gas::fee_market_params(&history.base_fee_per_gas, &rewards, config.gas_price_multiplier)
    }

    /// Build a fully-populated transaction request.
    ///
    /// Gas is estimated and padded by the configured multiplier; nonce and
    /// chain ID are read from the node on every call.
    pub async fn build(&self, call: &TxCall) -> BlockchainResult<TransactionRequest> {
        let from = self.wallet.address();
        let base = TransactionRequest::default()
            .with_from(from)
            .with_to(call.to)
            .with_value(call.value)
            .with_input(call.input.clone());

        let estimated = self.client.estimate_gas(&base).await?;
        let gas_limit = pad_gas(estimated, self.client.config().gas_limit_multiplier);
        let nonce = self.client.get_transaction_count(from).await?;
        let chain_id = self.client.get_chain_id().await?;

        let tx = base
            .with_nonce(nonce)
            .with_chain_id(chain_id.0)
            .with_gas_limit(gas_limit);

        Ok(apply_gas_params(tx, self.gas_params().await?))
    }

    /// Sign a built request and broadcast it.
    pub async fn sign_and_send(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let envelope = tx
            .build(&self.wallet.ethereum_wallet())
            .await
            .map_err(|e| BlockchainError::Build(e.to_string()))?;

        let tx_hash = self.client.send_raw_transaction(&envelope.encoded_2718()).await?;
        tracing::info!(address = %self.wallet.address(), tx_hash = %tx_hash, "Transaction was sent");
        Ok(tx_hash)
    }

    /// Wait for a transaction to be mined.
    ///
    /// Poll errors are retried until `tx_timeout_secs` runs out.
    ///
    /// # Arguments
    /// * `tx_hash` - Transaction hash to monitor
    pub async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        let config = self.client.config();
        let required_confirmations = config.confirmation_blocks;
        let timeout_secs = config.tx_timeout_secs;
        let poll_interval = Duration::from_millis(config.receipt_poll_ms.max(1));

        let result = timeout(Duration::from_secs(timeout_secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                // Get the receipt
                let receipt = match self.client.get_transaction_receipt(tx_hash).await {
                    Ok(Some(r)) => r,
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt poll failed");
                        continue;
                    }
                };

                let tx_block = receipt.block_number.unwrap_or_default();

                if !receipt.status() {
                    tracing::warn!(
                        tx_hash = %tx_hash,
                        block_number = tx_block,
                        logs = receipt.inner.logs().len(),
                        "Transaction failed"
                    );
                    metrics::record_transaction(false);
                    return Ok(ConfirmationStatus::Reverted { block_number: tx_block });
                }

                if required_confirmations > 0 {
                    let current_block = match self.client.get_block_number().await {
                        Ok(block) => block,
                        Err(e) => {
                            tracing::warn!(tx_hash = %tx_hash, error = %e, "Block number poll failed");
                            continue;
                        }
                    };
                    let confirmations = current_block.saturating_sub(tx_block) as u32;
                    if confirmations < required_confirmations {
                        tracing::debug!(
                            tx_hash = %tx_hash,
                            confirmations,
                            required = required_confirmations,
                            "Waiting for confirmations"
                        );
                        continue;
                    }
                }

                tracing::info!(tx_hash = %tx_hash, block_number = tx_block, "Transaction confirmed");
                metrics::record_transaction(true);
                return Ok(ConfirmationStatus::Confirmed { block_number: tx_block });
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                tx_hash,
                secs: timeout_secs,
            }),
        }
    }

    /// Build, sign, send and wait. A revert is returned as an error.
    pub async fn send_and_confirm(&self, call: &TxCall) -> BlockchainResult<TxHash> {
        let tx = self.build(call).await?;
        let tx_hash = self.sign_and_send(tx).await?;
        match self.wait_for_confirmation(tx_hash).await? {
            ConfirmationStatus::Confirmed { .. } => Ok(tx_hash),
            ConfirmationStatus::Reverted { .. } => Err(BlockchainError::Reverted(tx_hash)),
        }
    }

    /// The node client.
    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }

    /// The signing wallet.
    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }
}

/// Estimated gas with a safety margin, rounded down.
pub fn pad_gas(estimated: u64, multiplier: f64) -> u64 {
    (estimated as f64 * multiplier) as u64
}

/// Merge fee parameters into a request.
pub fn apply_gas_params(tx: TransactionRequest, params: GasParams) -> TransactionRequest {
    match params {
        GasParams::Legacy { gas_price } => tx.with_gas_price(gas_price),
        GasParams::FeeMarket {
            max_fee_per_gas,
            max_priority_fee_per_gas,
        } => tx
            .with_max_fee_per_gas(max_fee_per_gas)
            .with_max_priority_fee_per_gas(max_priority_fee_per_gas),
    }
}
