//! FIFO transaction serializer for the signing identity.
//!
//! The process holds exactly one ledger signing identity, and the chain
//! assigns each of its transactions a sequence number that must be used
//! exactly once, in order. Concurrent request handlers therefore never talk
//! to the ledger's write path directly: they enqueue onto a bounded FIFO
//! queue drained by a single worker, which submits one transaction and waits
//! for its outcome before touching the next. Observed submission order equals
//! enqueue order, and no sequence-number bookkeeping is needed anywhere else.

use std::sync::Arc;

use alloy::primitives::Address;
use tokio::sync::{mpsc, oneshot};

use crate::error::MintGateError;
use crate::ledger::{MintLedger, MintReceipt};

/// Default bound on queued submissions. Beyond this, new mints are rejected
/// with [`MintGateError::QueueFull`] instead of growing memory and latency
/// without limit.
pub const DEFAULT_QUEUE_DEPTH: usize = 64;

struct MintJob {
    recipient: Address,
    quantity: u64,
    reply: oneshot::Sender<Result<MintReceipt, MintGateError>>,
}

/// Handle to the signer's submission queue. Cheap to clone.
#[derive(Clone)]
pub struct TxSubmitter {
    queue: mpsc::Sender<MintJob>,
}

impl TxSubmitter {
    /// Start the worker loop and return the queue handle.
    pub fn spawn(ledger: Arc<dyn MintLedger>, queue_depth: usize) -> Self {
        let (queue, rx) = mpsc::channel(queue_depth.max(1));
        tokio::spawn(worker(ledger, rx));
        Self { queue }
    }

    /// Enqueue a mint and wait for its on-chain outcome.
    ///
    /// Fails immediately with [`MintGateError::QueueFull`] when the queue is
    /// at capacity; no ledger interaction happens in that case.
    pub async fn enqueue(
        &self,
        recipient: Address,
        quantity: u64,
    ) -> Result<MintReceipt, MintGateError> {
        let (reply, outcome) = oneshot::channel();
        self.queue
            .try_send(MintJob {
                recipient,
                quantity,
                reply,
            })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => MintGateError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => {
                    MintGateError::Mint("submission worker stopped".to_string())
                }
            })?;

        outcome
            .await
            .map_err(|_| MintGateError::Mint("submission worker dropped the job".to_string()))?
    }
}

async fn worker(ledger: Arc<dyn MintLedger>, mut rx: mpsc::Receiver<MintJob>) {
    while let Some(MintJob {
        recipient,
        quantity,
        reply,
    }) = rx.recv().await
    {
        let outcome = run_job(ledger.as_ref(), recipient, quantity).await;

        if let Err(ref e) = outcome {
            tracing::warn!(
                recipient = %recipient,
                quantity,
                error = %e,
                "mint submission failed"
            );
        }

        // The caller may have disconnected while waiting; the transaction's
        // fate on chain is already decided either way.
        if reply.send(outcome).is_err() {
            tracing::debug!(recipient = %recipient, "mint caller went away before the outcome");
        }
    }
}

async fn run_job(
    ledger: &dyn MintLedger,
    recipient: Address,
    quantity: u64,
) -> Result<MintReceipt, MintGateError> {
    let tx_hash = ledger.submit_mint(recipient, quantity).await?;
    tracing::info!(recipient = %recipient, quantity, tx = %tx_hash, "mint submitted");

    let receipt = ledger.await_confirmation(tx_hash).await?;
    tracing::info!(recipient = %recipient, tx = %receipt.tx_hash, "mint confirmed");

    Ok(receipt)
}
