//! Signed on-chain operations for a single account.
//!
//! `AccountClient` owns one key and one node connection. Reads go straight to
//! the node; every write goes through [`retry`] with the transaction retry
//! budget.
//!
//! A transaction that is mined but reverted counts as a failed attempt and is
//! resent as a brand-new transaction, paying gas again.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::Signature;
use alloy::sol;
use alloy::sol_types::{Eip712Domain, SolCall, SolStruct};
use std::time::Duration;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::gas;
use crate::blockchain::transaction::TxBuilder;
use crate::blockchain::types::{
    ApprovalOutcome, BlockchainError, BlockchainResult, ConfirmationStatus, GasParams,
    TokenBalance, TxCall,
};
use crate::blockchain::units;
use crate::blockchain::wallet::Wallet;
use crate::resilience::{retry, RetryExhausted, RetryPolicy};

sol! {
    interface IERC20 {
        function decimals() external view returns (uint8);
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// Polling interval of [`AccountClient::wait_for_gas`].
const GAS_POLL_INTERVAL: Duration = Duration::from_secs(20);

/// One key, one connection.
#[derive(Debug, Clone)]
pub struct AccountClient {
    tx: TxBuilder,
    retry: RetryPolicy,
}

impl AccountClient {
    /// `retry` paces transaction attempts; its attempt count is replaced by
    /// the client's `tx_retries`.
    pub fn new(client: BlockchainClient, wallet: Wallet, retry: RetryPolicy) -> Self {
        let retry = retry.with_attempts(client.config().tx_retries);
        Self {
            tx: TxBuilder::new(client, wallet),
            retry,
        }
    }

    /// The account's address.
    pub fn address(&self) -> Address {
        self.tx.wallet().address()
    }

    /// The signing wallet.
    pub fn wallet(&self) -> &Wallet {
        self.tx.wallet()
    }

    /// Native balance in wei.
    pub async fn native_balance(&self) -> BlockchainResult<U256> {
        self.tx.client().get_balance(self.address()).await
    }

    /// ERC-20 balance of this account.
    pub async fn erc20_balance(&self, token: Address) -> BlockchainResult<TokenBalance> {
        let decimals = self.erc20_decimals(token).await?;
        let raw = self
            .read::<IERC20::balanceOfCall>(token, IERC20::balanceOfCall { owner: self.address() })
            .await?;
        Ok(TokenBalance { raw, decimals })
    }

    /// Fee parameters for the next transaction.
    pub async fn compute_gas_params(&self) -> BlockchainResult<GasParams> {
        self.tx.gas_params().await
    }

    /// Wait until `tx_hash` is mined. A revert is reported, not raised.
    pub async fn wait_for_transaction(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        self.tx.wait_for_confirmation(tx_hash).await
    }

    /// Build, sign, send and confirm `call`, retrying the whole cycle.
    pub async fn send_transaction(&self, call: TxCall) -> Result<TxHash, RetryExhausted> {
        let call = &call;
        retry("send transaction", &self.retry, || self.tx.send_and_confirm(call)).await
    }

    /// Make sure `spender` may move at least `amount` (human units) of `token`.
    ///
    /// With `approve_max` the approval is for `U256::MAX` instead of the
    /// exact amount. A second call after the allowance is in place is a no-op.
    pub async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: &str,
        approve_max: bool,
    ) -> Result<ApprovalOutcome, RetryExhausted> {
        let required = retry("check allowance", &self.retry, || async move {
            let decimals = self.erc20_decimals(token).await?;
            let required = units::to_base_units(amount, decimals)?;
            let allowance = self
                .read::<IERC20::allowanceCall>(
                    token,
                    IERC20::allowanceCall {
                        owner: self.address(),
                        spender,
                    },
                )
                .await?;
            Ok::<_, BlockchainError>(approval_amount(allowance, required, approve_max))
        })
        .await?;

        let Some(approve_amount) = required else {
            tracing::info!(address = %self.address(), token = %token, "Approve not needed");
            return Ok(ApprovalOutcome::NotNeeded);
        };

        tracing::info!(address = %self.address(), token = %token, spender = %spender, "Approving tokens");
        let input = IERC20::approveCall {
            spender,
            amount: approve_amount,
        }
        .abi_encode();
        self.send_transaction(TxCall::contract(token, input))
            .await
            .map(ApprovalOutcome::Approved)
    }

    /// EIP-712 signature over `payload`.
    pub async fn sign_typed_data<T: SolStruct>(
        &self,
        payload: &T,
        domain: &Eip712Domain,
    ) -> BlockchainResult<Signature> {
        self.wallet().sign_typed_data(payload, domain).await
    }

    /// EIP-191 personal-message signature over `text`.
    pub async fn sign_message(&self, text: &str) -> BlockchainResult<Signature> {
        self.wallet().sign_message(text.as_bytes()).await
    }

    /// Block until the legacy gas price drops below `max_gwei`.
    ///
    /// RPC errors while polling are logged and the poll continues.
    pub async fn wait_for_gas(&self, max_gwei: u64) {
        loop {
            match self.tx.client().get_gas_price().await {
                Ok(price) if gas::below_ceiling(price, max_gwei) => return,
                Ok(price) => tracing::info!(
                    current_gwei = units::wei_to_gwei(price) as u64,
                    max_gwei,
                    "Waiting for gas to drop"
                ),
                Err(e) => tracing::warn!(error = %e, "Gas price poll failed"),
            }
            tokio::time::sleep(GAS_POLL_INTERVAL).await;
        }
    }

    async fn erc20_decimals(&self, token: Address) -> BlockchainResult<u8> {
        self.read::<IERC20::decimalsCall>(token, IERC20::decimalsCall {})
            .await
    }

    async fn read<C: SolCall>(&self, to: Address, call: C) -> BlockchainResult<C::Return> {
        let request = TransactionRequest::default()
            .with_to(to)
            .with_input(call.abi_encode());
        let output = self.tx.client().call(&request).await?;
        C::abi_decode_returns(&output).map_err(|e| BlockchainError::Decode(e.to_string()))
    }
}

/// Amount to approve, or `None` when the allowance already covers `required`.
pub fn approval_amount(allowance: U256, required: U256, approve_max: bool) -> Option<U256> {
    if allowance >= required {
        None
    } else if approve_max {
        Some(U256::MAX)
    } else {
        Some(required)
    }
}
