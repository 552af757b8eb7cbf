//! The mint contract behind an opaque ledger seam.
//!
//! The write path is an explicit two-phase operation: `submit_mint` hands the
//! transaction to the chain and returns its id; `await_confirmation` waits for
//! the receipt. The [`crate::submitter::TxSubmitter`] drives both phases for
//! one transaction before touching the next, which is what keeps the signing
//! identity's sequence numbers gap-free.

use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::Provider;
use async_trait::async_trait;

use crate::error::MintGateError;
use crate::MintableNft;

/// Timeout on handing a transaction to the RPC node.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout on waiting for the transaction receipt.
const CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Confirmation receipt for a mint transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    pub tx_hash: TxHash,
}

/// The external asset ledger, as seen by this gateway.
#[async_trait]
pub trait MintLedger: Send + Sync {
    /// Submit `mintTo(recipient, quantity)` and return the transaction id
    /// without waiting for confirmation.
    async fn submit_mint(&self, recipient: Address, quantity: u64)
        -> Result<TxHash, MintGateError>;

    /// Wait for the transaction to be confirmed. Reverted or timed-out
    /// transactions are errors.
    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<MintReceipt, MintGateError>;

    /// Read the contract's total minted supply.
    async fn total_supply(&self) -> Result<U256, MintGateError>;

    /// Latest chain height, for liveness checks.
    async fn latest_block(&self) -> Result<u64, MintGateError>;
}

/// [`MintLedger`] implementation over the on-chain mint contract.
pub struct NftContractLedger<P> {
    provider: P,
    contract: Address,
}

impl<P> NftContractLedger<P> {
    pub fn new(provider: P, contract: Address) -> Self {
        Self { provider, contract }
    }
}

#[async_trait]
impl<P: Provider + Send + Sync> MintLedger for NftContractLedger<P> {
    async fn submit_mint(
        &self,
        recipient: Address,
        quantity: u64,
    ) -> Result<TxHash, MintGateError> {
        let contract = MintableNft::new(self.contract, &self.provider);
        // Timeout on send() to prevent an indefinite hang if the RPC is
        // unresponsive. A hang here would stall the whole submission queue.
        let pending = tokio::time::timeout(
            SUBMIT_TIMEOUT,
            contract.mintTo(recipient, U256::from(quantity)).send(),
        )
        .await
        .map_err(|_| MintGateError::Mint("mintTo send timed out after 30s".to_string()))?
        .map_err(|e| MintGateError::Mint(format!("mintTo send failed: {e}")))?;

        Ok(*pending.tx_hash())
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<MintReceipt, MintGateError> {
        let poll = async {
            loop {
                match self.provider.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return Ok(receipt),
                    Ok(None) => tokio::time::sleep(RECEIPT_POLL_INTERVAL).await,
                    Err(e) => {
                        return Err(MintGateError::Mint(format!("receipt lookup failed: {e}")))
                    }
                }
            }
        };

        let receipt = tokio::time::timeout(CONFIRM_TIMEOUT, poll)
            .await
            .map_err(|_| MintGateError::Mint("mintTo receipt timed out after 60s".to_string()))??;

        if !receipt.status() {
            return Err(MintGateError::Mint("mintTo reverted".to_string()));
        }

        Ok(MintReceipt {
            tx_hash: receipt.transaction_hash,
        })
    }

    async fn total_supply(&self) -> Result<U256, MintGateError> {
        let contract = MintableNft::new(self.contract, &self.provider);
        contract
            .totalSupply()
            .call()
            .await
            .map_err(|e| MintGateError::Read(format!("totalSupply failed: {e}")))
    }

    async fn latest_block(&self) -> Result<u64, MintGateError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| MintGateError::Read(format!("block number lookup failed: {e}")))
    }
}
