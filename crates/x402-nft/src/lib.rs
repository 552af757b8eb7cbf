//! Payment-gated NFT mint core.
//!
//! Gates mint operations behind x402 payment attestations and funnels every
//! state-changing contract call through a single signing identity.
//!
//! # Components
//!
//! - [`attestation`] — payer extraction from the forwarded payment header ([`decode_payer`])
//! - [`pricing`] — static route pricing table consulted by the payment gate
//! - [`ledger`] — the on-chain mint contract behind the [`MintLedger`] seam
//! - [`submitter`] — FIFO transaction serializer for the signing identity ([`TxSubmitter`])
//! - [`minter`] — mint orchestration and supply queries ([`Minter`])
//!
//! Payment verification and settlement happen upstream: an external x402
//! facilitator validates the payment proof before a request reaches this
//! crate. Here the attestation header is only decoded to identify the payer;
//! a request without a resolvable payer is rejected with
//! [`MintGateError::PaymentRequired`].

pub mod attestation;
pub mod error;
pub mod ledger;
pub mod minter;
pub mod pricing;
pub mod submitter;

#[cfg(test)]
mod testutil;

use alloy::sol;

// On-chain interface for the mint contract.
sol! {
    #[sol(rpc)]
    interface MintableNft {
        function mintTo(address recipient, uint256 quantity) external;
        function totalSupply() external view returns (uint256);
    }
}

// Re-exports
pub use attestation::{decode_payer, PAYMENT_HEADER};
pub use error::MintGateError;
pub use ledger::{MintLedger, MintReceipt, NftContractLedger};
pub use minter::{MintOutcome, Minter, MAX_QUANTITY, MIN_QUANTITY};
pub use pricing::{default_table, PricingTable, PricingTableBuilder, RoutePrice};
pub use submitter::{TxSubmitter, DEFAULT_QUEUE_DEPTH};
