//! In-memory ledger stub shared by the crate's unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::error::MintGateError;
use crate::ledger::{MintLedger, MintReceipt};

pub(crate) struct StubLedger {
    submissions: Mutex<Vec<(Address, u64)>>,
    supply: U256,
    supply_reads: AtomicUsize,
    next_id: AtomicUsize,
    fail_quantity: Option<u64>,
    in_flight: AtomicBool,
    overlap_detected: AtomicBool,
    /// When present, confirmations block until a permit is released.
    confirm_gate: Option<Semaphore>,
}

impl StubLedger {
    pub(crate) fn new() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            supply: U256::ZERO,
            supply_reads: AtomicUsize::new(0),
            next_id: AtomicUsize::new(0),
            fail_quantity: None,
            in_flight: AtomicBool::new(false),
            overlap_detected: AtomicBool::new(false),
            confirm_gate: None,
        }
    }

    pub(crate) fn gated() -> Self {
        Self {
            confirm_gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    pub(crate) fn with_supply(supply: u64) -> Self {
        Self {
            supply: U256::from(supply),
            ..Self::new()
        }
    }

    /// Submissions for this quantity fail with a stub revert.
    pub(crate) fn failing_quantity(mut self, quantity: u64) -> Self {
        self.fail_quantity = Some(quantity);
        self
    }

    pub(crate) fn submissions(&self) -> Vec<(Address, u64)> {
        self.submissions.lock().unwrap().clone()
    }

    pub(crate) fn supply_reads(&self) -> usize {
        self.supply_reads.load(Ordering::SeqCst)
    }

    pub(crate) fn overlap_detected(&self) -> bool {
        self.overlap_detected.load(Ordering::SeqCst)
    }

    pub(crate) fn release_confirmations(&self, n: usize) {
        if let Some(gate) = &self.confirm_gate {
            gate.add_permits(n);
        }
    }

    fn tx_hash(&self) -> TxHash {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        TxHash::from(bytes)
    }
}

#[async_trait]
impl MintLedger for StubLedger {
    async fn submit_mint(
        &self,
        recipient: Address,
        quantity: u64,
    ) -> Result<TxHash, MintGateError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.overlap_detected.store(true, Ordering::SeqCst);
        }
        self.submissions.lock().unwrap().push((recipient, quantity));

        if self.fail_quantity == Some(quantity) {
            self.in_flight.store(false, Ordering::SeqCst);
            return Err(MintGateError::Mint("stub ledger rejected the mint".to_string()));
        }

        Ok(self.tx_hash())
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<MintReceipt, MintGateError> {
        if let Some(gate) = &self.confirm_gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| MintGateError::Mint("stub gate closed".to_string()))?;
            permit.forget();
        }
        // Yield so overlapping submissions would have a chance to show up.
        tokio::task::yield_now().await;
        self.in_flight.store(false, Ordering::SeqCst);
        Ok(MintReceipt { tx_hash })
    }

    async fn total_supply(&self) -> Result<U256, MintGateError> {
        self.supply_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.supply)
    }

    async fn latest_block(&self) -> Result<u64, MintGateError> {
        Ok(1)
    }
}
