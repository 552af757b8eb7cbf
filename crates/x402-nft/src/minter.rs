//! Mint orchestration and supply queries.
//!
//! Validates each verified request before any ledger interaction, then routes
//! writes through the signer's submission queue. Supply queries go straight
//! to the ledger: reads do not touch the signing identity's transaction
//! stream, so they need no serialization and observe whatever the chain has
//! most recently committed.

use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256};

use crate::error::MintGateError;
use crate::ledger::MintLedger;
use crate::submitter::TxSubmitter;

/// Smallest quantity a single request may mint.
pub const MIN_QUANTITY: u64 = 1;
/// Largest quantity a single request may mint.
pub const MAX_QUANTITY: u64 = 20;

/// Outcome of a confirmed mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintOutcome {
    pub minted_to: Address,
    pub quantity: u64,
    pub tx_hash: TxHash,
}

/// Orchestrates mint requests over the shared ledger and submission queue.
#[derive(Clone)]
pub struct Minter {
    ledger: Arc<dyn MintLedger>,
    submitter: TxSubmitter,
}

impl Minter {
    pub fn new(ledger: Arc<dyn MintLedger>, queue_depth: usize) -> Self {
        let submitter = TxSubmitter::spawn(Arc::clone(&ledger), queue_depth);
        Self { ledger, submitter }
    }

    /// Mint `quantity` tokens to the payer.
    ///
    /// Fails with [`MintGateError::PaymentRequired`] when no payer resolved
    /// and [`MintGateError::InvalidQuantity`] when `quantity` is outside
    /// `[MIN_QUANTITY, MAX_QUANTITY]`; neither failure touches the ledger.
    pub async fn mint(
        &self,
        payer: Option<Address>,
        quantity: u64,
    ) -> Result<MintOutcome, MintGateError> {
        let payer = payer.ok_or(MintGateError::PaymentRequired)?;
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
            return Err(MintGateError::InvalidQuantity(quantity));
        }
        self.execute(payer, quantity).await
    }

    /// Fixed-quantity variant for routes whose quantity is part of the route
    /// itself. The bounds check is skipped; call sites pass a constant.
    pub async fn mint_fixed(
        &self,
        payer: Option<Address>,
        quantity: u64,
    ) -> Result<MintOutcome, MintGateError> {
        let payer = payer.ok_or(MintGateError::PaymentRequired)?;
        self.execute(payer, quantity).await
    }

    async fn execute(&self, payer: Address, quantity: u64) -> Result<MintOutcome, MintGateError> {
        let receipt = self.submitter.enqueue(payer, quantity).await?;
        Ok(MintOutcome {
            minted_to: payer,
            quantity,
            tx_hash: receipt.tx_hash,
        })
    }

    /// Total minted supply, read fresh from the ledger on every call.
    ///
    /// The payment gate still applies — a request without a resolvable payer
    /// is rejected — but the payer identity is not otherwise used.
    pub async fn total_minted(&self, payer: Option<Address>) -> Result<U256, MintGateError> {
        if payer.is_none() {
            return Err(MintGateError::PaymentRequired);
        }
        self.ledger.total_supply().await
    }

    /// Ledger liveness, for health checks.
    pub async fn latest_block(&self) -> Result<u64, MintGateError> {
        self.ledger.latest_block().await
    }
}
