//! Key handling and signing.
//!
//! # Security
//! - Keys are never logged or serialized
//! - No local nonce is cached; the node is the source of truth on every send

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signature, Signer};
use alloy::sol_types::{Eip712Domain, SolStruct};

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// One private key and the operations that need it.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::debug!(address = %signer.address(), "Wallet initialized");

        Ok(Self { signer })
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Network wallet for building signed transaction envelopes.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }

    /// Sign a 32-byte hash without any prefix.
    pub async fn sign_hash(&self, hash: B256) -> BlockchainResult<Signature> {
        self.signer
            .sign_hash(&hash)
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))
    }

    /// Sign arbitrary message bytes (with Ethereum prefix).
    pub async fn sign_message(&self, message: &[u8]) -> BlockchainResult<Signature> {
        self.signer
            .sign_message(message)
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Message signing failed: {}", e)))
    }

    /// Sign an EIP-712 struct under `domain`.
    pub async fn sign_typed_data<T: SolStruct>(
        &self,
        payload: &T,
        domain: &Eip712Domain,
    ) -> BlockchainResult<Signature> {
        self.sign_hash(payload.eip712_signing_hash(domain)).await
    }
}
