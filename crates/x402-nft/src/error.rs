use thiserror::Error;

/// Errors returned by mint gateway operations.
#[derive(Debug, Error)]
pub enum MintGateError {
    /// No resolvable payer — the attestation header was absent or malformed.
    #[error("payment required")]
    PaymentRequired,

    /// Requested quantity is outside the allowed bounds.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u64),

    /// The signer's submission queue is at capacity.
    #[error("mint queue full")]
    QueueFull,

    /// The ledger rejected, reverted, or timed out a mint submission.
    #[error("mint failed: {0}")]
    Mint(String),

    /// A read-only ledger query failed.
    #[error("supply read failed: {0}")]
    Read(String),
}
